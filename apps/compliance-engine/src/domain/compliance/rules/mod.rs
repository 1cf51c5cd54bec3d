//! Compliance rule implementations.
//!
//! Every rule module exposes its schema name and a function returning its
//! default schema; the builder fills missing parameters from that default.

pub mod buying_power;
pub mod map_rule;
pub mod opposing_cancel;
pub mod opposing_submission;
pub mod order_count_limit;
pub mod region_filter;
pub mod reject;
pub mod restriction_period;
pub mod scope_filter;
pub mod time_filter;

#[cfg(test)]
pub(crate) mod testing;

pub use buying_power::BuyingPowerComplianceRule;
pub use map_rule::{
    MapComplianceRule, PerAccountComplianceRule, PerSecurityComplianceRule, RuleFactory,
};
pub use opposing_cancel::OpposingCancelComplianceRule;
pub use opposing_submission::OpposingSubmissionComplianceRule;
pub use order_count_limit::OrderCountLimitComplianceRule;
pub use region_filter::RegionFilterComplianceRule;
pub use reject::{RejectCancelsComplianceRule, RejectSubmissionsComplianceRule};
pub use restriction_period::{
    CancelRestrictionPeriodComplianceRule, RestrictionPeriod,
    SubmissionRestrictionPeriodComplianceRule,
};
pub use scope_filter::ScopeFilterComplianceRule;
pub use time_filter::TimeFilterComplianceRule;
