//! Compliance metrics.
//!
//! Recorded through the `metrics` facade; installing an exporter is left to
//! the embedding process. Without one, recording is a no-op.
//!
//! # Example
//!
//! ```ignore
//! use compliance_engine::observability::{describe_metrics, record_check, CheckOutcome};
//!
//! describe_metrics();
//! record_check("submit", CheckOutcome::Accepted);
//! ```

use metrics::{counter, describe_counter, describe_gauge, gauge};

use crate::domain::compliance::ComplianceRuleEntryState;

/// Register descriptions for every compliance metric.
pub fn describe_metrics() {
    describe_counter!(
        "compliance_checks_total",
        "Compliance checks performed, by operation and outcome"
    );
    describe_counter!(
        "compliance_violations_total",
        "Compliance rule violations, by schema name and entry state"
    );
    describe_gauge!(
        "compliance_rules_active",
        "Compiled compliance rule entries held by the rule set"
    );
}

/// Outcome label of a compliance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Every consulted rule accepted.
    Accepted,
    /// An active rule rejected.
    Rejected,
    /// A rule failed for a reason other than a compliance check.
    Error,
}

impl CheckOutcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Error => "error",
        }
    }
}

/// Record a submit, cancel or add check.
pub fn record_check(operation: &'static str, outcome: CheckOutcome) {
    counter!(
        "compliance_checks_total",
        "operation" => operation,
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record a rule violation.
pub fn record_violation(rule: &str, state: ComplianceRuleEntryState) {
    counter!(
        "compliance_violations_total",
        "rule" => rule.to_string(),
        "state" => state.to_string()
    )
    .increment(1);
}

/// Update the number of compiled rule entries.
pub fn set_active_rules(count: usize) {
    #[allow(clippy::cast_precision_loss)]
    gauge!("compliance_rules_active").set(count as f64);
}
