//! Application Services
//!
//! Long-lived services coordinating the compliance domain with the platform's
//! collaborators.

mod compliance_rule_set;

pub use compliance_rule_set::ComplianceRuleSet;
