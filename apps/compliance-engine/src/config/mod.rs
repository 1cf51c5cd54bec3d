//! Configuration module for the compliance engine.
//!
//! Loads the YAML configuration, interpolates environment variables and
//! validates reference data and policies before anything is compiled.
//!
//! # Usage
//!
//! ```rust,ignore
//! use compliance_engine::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("{} policies", config.policies.len());
//! ```

mod observability;
mod policies;
mod reference_data;

use std::collections::HashSet;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use observability::{LOG_FORMATS, LoggingConfig, ObservabilityConfig};
pub use policies::PolicyConfig;
pub use reference_data::ReferenceDataConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Reference data.
    #[serde(default)]
    pub reference_data: ReferenceDataConfig,
    /// Compliance policies, compiled in order.
    #[serde(default)]
    pub policies: Vec<PolicyConfig>,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let mut result = input.to_string();

    // Match ${VAR} or ${VAR:-default} patterns
    let re = ENV_VAR_REGEX.get_or_init(|| {
        // This regex pattern is compile-time constant and always valid
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    for cap in re.captures_iter(input) {
        // Group 0 and group 1 are guaranteed by the regex pattern structure
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        let Some(var_match) = cap.get(1) else {
            continue;
        };
        let full_match = full_match.as_str();
        let var_name = var_match.as_str();
        let default_value = cap.get(2).map(|m| m.as_str());

        let value = match std::env::var(var_name) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        };

        result = result.replace(full_match, &value);
    }

    result
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let logging = &config.observability.logging;
    if !LOG_FORMATS.contains(&logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {LOG_FORMATS:?}"
        )));
    }

    let mut codes = HashSet::new();
    for venue in &config.reference_data.venues {
        if venue.code.is_empty() {
            return Err(ConfigError::ValidationError(
                "reference_data.venues entries need a code".to_string(),
            ));
        }
        if !codes.insert(&venue.code) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate venue code {}",
                venue.code
            )));
        }
        if venue.time_zone.parse::<Tz>().is_err() {
            return Err(ConfigError::ValidationError(format!(
                "venue {} has unknown time_zone {}",
                venue.code, venue.time_zone
            )));
        }
    }

    let mut ids = HashSet::new();
    for policy in &config.policies {
        if !ids.insert(policy.id) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate policy id {}",
                policy.id
            )));
        }
        if policy.account.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "policy {} has no account",
                policy.id
            )));
        }
    }

    Ok(())
}
