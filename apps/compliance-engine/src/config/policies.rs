//! Compliance policy configuration.

use serde::{Deserialize, Serialize};

use crate::domain::compliance::{
    ComplianceRuleEntry, ComplianceRuleEntryState, ComplianceRuleId, ComplianceRuleSchema,
};
use crate::domain::shared::AccountId;

/// A rule schema assigned to an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyConfig {
    /// Entry identifier, unique across policies.
    pub id: ComplianceRuleId,
    /// Account the rule applies to.
    pub account: AccountId,
    /// Participation state.
    #[serde(default)]
    pub state: ComplianceRuleEntryState,
    /// Rule schema.
    pub schema: ComplianceRuleSchema,
}

impl PolicyConfig {
    /// The policy as a rule entry.
    #[must_use]
    pub fn to_entry(&self) -> ComplianceRuleEntry {
        ComplianceRuleEntry::new(
            self.id,
            self.account.clone(),
            self.state,
            self.schema.clone(),
        )
    }
}
