//! Compliance Engine Binary
//!
//! Loads the compliance policies and verifies that every one of them
//! compiles against the configured reference data.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin compliance-engine -- config.yaml
//! ```
//!
//! # Environment Variables
//!
//! - `COMPLIANCE_CONFIG`: config path when no argument is given (default: config.yaml)
//! - `RUST_LOG`: overrides the configured log level

use std::collections::BTreeMap;

use anyhow::Context;
use compliance_engine::config::load_config;
use compliance_engine::infrastructure::Container;
use compliance_engine::observability::describe_metrics;
use compliance_engine::telemetry::init_telemetry;

/// Default configuration path.
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

fn config_path() -> String {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("COMPLIANCE_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

fn main() -> anyhow::Result<()> {
    let path = config_path();
    let config = load_config(Some(&path)).with_context(|| format!("loading {path}"))?;

    init_telemetry(&config.observability.logging).context("initializing logging")?;
    describe_metrics();

    tracing::info!(
        config = %path,
        venues = config.reference_data.venues.len(),
        policies = config.policies.len(),
        "Starting Cream Compliance Engine"
    );

    let container = Container::from_config(&config);
    let rule_set = container.rule_set(&config).context("compiling policies")?;

    let mut per_account: BTreeMap<String, usize> = BTreeMap::new();
    for policy in &config.policies {
        *per_account.entry(policy.account.to_string()).or_default() += 1;
    }
    for (account, count) in &per_account {
        tracing::info!(account = %account, policies = count, "Account policies active");
    }

    tracing::info!(
        entries = rule_set.len(),
        accounts = per_account.len(),
        "Compliance engine ready"
    );
    Ok(())
}
