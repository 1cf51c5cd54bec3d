//! Observability module for compliance metrics.
//!
//! Logging setup lives in [`crate::telemetry`].

mod metrics;

pub use metrics::{
    CheckOutcome, describe_metrics, record_check, record_violation, set_active_rules,
};
