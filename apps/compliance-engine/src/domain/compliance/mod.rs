//! Compliance Bounded Context
//!
//! Policies interposed between order entry and the execution driver.
//!
//! # Key Concepts
//!
//! - **Schema**: named rule kind plus typed parameters; schemas nest through
//!   [`wrap`]/[`unwrap`]
//! - **Rule**: the [`ComplianceRule`] contract (`submit`, `cancel`, `add`)
//! - **Terminal rules**: leaf policies with private state
//! - **Decorators**: gate an inner rule by region, scope or time of day
//! - **Multiplexers**: one independent child rule per account or security

pub mod entry;
pub mod errors;
pub mod parameter;
pub mod rule;
pub mod rules;
pub mod schema;
pub mod time_window;
pub mod value;

pub use entry::{
    ComplianceRuleEntry, ComplianceRuleEntryState, ComplianceRuleId,
    ComplianceRuleViolationRecord,
};
pub use errors::{ComplianceError, ComplianceFailure, SchemaError};
pub use parameter::ComplianceParameter;
pub use rule::ComplianceRule;
pub use schema::{ComplianceRuleSchema, WRAPPED_ARGUMENTS, WRAPPED_NAME, unwrap, wrap};
pub use time_window::TimeWindow;
pub use value::ComplianceValue;
