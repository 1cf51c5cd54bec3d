//! Compliance rule entries and violation records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ComplianceRuleSchema;
use crate::domain::shared::{AccountId, OrderId, Timestamp};

/// Identifier of a compliance rule entry.
pub type ComplianceRuleId = u64;

/// How a rule entry takes part in checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceRuleEntryState {
    /// Violations block the action.
    #[default]
    Active,
    /// Violations are recorded but do not block.
    Passive,
    /// The rule is not consulted.
    Disabled,
    /// The rule is removed.
    Deleted,
}

impl fmt::Display for ComplianceRuleEntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Passive => write!(f, "PASSIVE"),
            Self::Disabled => write!(f, "DISABLED"),
            Self::Deleted => write!(f, "DELETED"),
        }
    }
}

/// A rule schema assigned to an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRuleEntry {
    /// Entry identifier.
    pub id: ComplianceRuleId,
    /// Account the rule applies to.
    pub directory_entry: AccountId,
    /// Participation state.
    pub state: ComplianceRuleEntryState,
    /// Rule schema.
    pub schema: ComplianceRuleSchema,
}

impl ComplianceRuleEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(
        id: ComplianceRuleId,
        directory_entry: impl Into<AccountId>,
        state: ComplianceRuleEntryState,
        schema: ComplianceRuleSchema,
    ) -> Self {
        Self {
            id,
            directory_entry: directory_entry.into(),
            state,
            schema,
        }
    }
}

/// A recorded compliance rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRuleViolationRecord {
    /// Account that submitted or canceled the order.
    pub account: AccountId,
    /// Order that violated the rule.
    pub order_id: OrderId,
    /// Violated entry.
    pub rule_id: ComplianceRuleId,
    /// Name of the violated schema.
    pub schema_name: String,
    /// Reason given by the rule.
    pub reason: String,
    /// Time of the violation.
    pub timestamp: Timestamp,
}
