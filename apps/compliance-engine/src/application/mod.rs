//! Application Layer
//!
//! Compiles compliance rule schemas into rule trees and applies them to each
//! account's submissions and cancellations.

pub mod registry;
pub mod services;

pub use registry::{
    BuildResult, ComplianceRuleBuilder, ComplianceRuleRegistry, Parameters, RuleConstructor,
};
pub use services::ComplianceRuleSet;
