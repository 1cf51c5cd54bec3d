//! Logging Setup
//!
//! Installs the global `tracing` subscriber.
//!
//! # Configuration
//!
//! - `observability.logging.level`: default filter directive (default: `info`)
//! - `observability.logging.format`: `json`, `pretty` or `compact`
//! - `RUST_LOG`: overrides the configured level when set
//!
//! # Usage
//!
//! ```rust,ignore
//! use compliance_engine::config::LoggingConfig;
//! use compliance_engine::telemetry::init_telemetry;
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&LoggingConfig::default())?;
//!     // ... application code
//!     Ok(())
//! }
//! ```

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

use crate::config::LoggingConfig;

/// Build the filter: `RUST_LOG` when set and valid, else the configured level.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_telemetry(config: &LoggingConfig) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    match config.format.as_str() {
        "pretty" => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(config.include_target),
            )
            .try_init(),
        "compact" => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(config.include_target),
            )
            .try_init(),
        _ => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(config.include_target),
            )
            .try_init(),
    }?;

    tracing::info!(
        level = %config.level,
        format = %config.format,
        "Logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_level_falls_back() {
        let config = LoggingConfig {
            level: "not a [directive".to_string(),
            ..LoggingConfig::default()
        };
        // Must not panic whatever RUST_LOG holds.
        let _ = env_filter(&config);
    }

    #[test]
    fn second_init_fails() {
        let config = LoggingConfig::default();
        let _ = init_telemetry(&config);
        assert!(init_telemetry(&config).is_err());
    }
}
