//! Rules that reject every submission or every cancellation.

use crate::domain::compliance::{
    ComplianceError, ComplianceParameter, ComplianceRule, ComplianceRuleSchema,
};
use crate::domain::order_execution::Order;

/// Schema name of [`RejectSubmissionsComplianceRule`].
pub const REJECT_SUBMISSIONS_NAME: &str = "reject_submissions";

/// Schema name of [`RejectCancelsComplianceRule`].
pub const REJECT_CANCELS_NAME: &str = "reject_cancels";

/// Default schema of [`RejectSubmissionsComplianceRule`].
#[must_use]
pub fn reject_submissions_schema() -> ComplianceRuleSchema {
    ComplianceRuleSchema::new(
        REJECT_SUBMISSIONS_NAME,
        vec![ComplianceParameter::new("message", "Submissions not permitted.")],
    )
}

/// Default schema of [`RejectCancelsComplianceRule`].
#[must_use]
pub fn reject_cancels_schema() -> ComplianceRuleSchema {
    ComplianceRuleSchema::new(
        REJECT_CANCELS_NAME,
        vec![ComplianceParameter::new("message", "Cancels not permitted.")],
    )
}

/// Rejects every submission.
#[derive(Debug, Clone)]
pub struct RejectSubmissionsComplianceRule {
    message: String,
}

impl RejectSubmissionsComplianceRule {
    /// Create a rule rejecting with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ComplianceRule for RejectSubmissionsComplianceRule {
    fn submit(&self, _order: &Order) -> Result<(), ComplianceError> {
        Err(ComplianceError::rejected(self.message.clone()))
    }
}

/// Rejects every cancellation.
#[derive(Debug, Clone)]
pub struct RejectCancelsComplianceRule {
    message: String,
}

impl RejectCancelsComplianceRule {
    /// Create a rule rejecting with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ComplianceRule for RejectCancelsComplianceRule {
    fn cancel(&self, _order: &Order) -> Result<(), ComplianceError> {
        Err(ComplianceError::rejected(self.message.clone()))
    }
}
