//! Compliance Rule Set
//!
//! Per-account collection of compiled rule entries. Every submission and
//! cancellation for an account is checked against that account's entries;
//! each entry's state decides whether a violation blocks the action or is
//! only recorded.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::application::registry::ComplianceRuleBuilder;
use crate::domain::clients::TimeClient;
use crate::domain::compliance::{
    ComplianceError, ComplianceRule, ComplianceRuleEntry, ComplianceRuleEntryState,
    ComplianceRuleId, ComplianceRuleViolationRecord,
};
use crate::domain::order_execution::Order;
use crate::domain::shared::AccountId;
use crate::observability::{CheckOutcome, record_check, record_violation, set_active_rules};

struct CompiledRule {
    entry: ComplianceRuleEntry,
    rule: Arc<dyn ComplianceRule>,
}

#[derive(Default)]
struct AccountRules {
    rules: Vec<Arc<CompiledRule>>,
    orders: Vec<Arc<Order>>,
}

#[derive(Clone, Copy)]
enum Check {
    Submit,
    Cancel,
}

impl Check {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Cancel => "cancel",
        }
    }
}

/// Compiled compliance rules and remembered orders, keyed by account.
///
/// Rules are invoked on a snapshot taken under the lock, so a rule may be
/// replaced while a check against its previous version is still running.
pub struct ComplianceRuleSet {
    builder: ComplianceRuleBuilder,
    time_client: Arc<dyn TimeClient>,
    accounts: Mutex<HashMap<AccountId, AccountRules>>,
    violations: Mutex<Vec<ComplianceRuleViolationRecord>>,
}

impl ComplianceRuleSet {
    /// Create an empty rule set compiling schemas through `builder`.
    #[must_use]
    pub fn new(builder: ComplianceRuleBuilder) -> Self {
        let time_client = builder.time_client();
        Self {
            builder,
            time_client,
            accounts: Mutex::new(HashMap::new()),
            violations: Mutex::new(Vec::new()),
        }
    }

    /// Install, replace or delete an entry.
    ///
    /// Any entry with the same id is removed. Unless the new entry is
    /// [`ComplianceRuleEntryState::Deleted`], its schema is compiled and every
    /// order already seen for the account is replayed through `add`.
    ///
    /// # Errors
    ///
    /// Returns the builder's error if the schema does not compile; the
    /// previous entry with the same id is then left in place.
    pub fn update(&self, entry: ComplianceRuleEntry) -> Result<(), ComplianceError> {
        let mut accounts = self.accounts.lock();
        if entry.state == ComplianceRuleEntryState::Deleted {
            for rules in accounts.values_mut() {
                rules.rules.retain(|compiled| compiled.entry.id != entry.id);
            }
            info!(rule_id = entry.id, "Compliance rule deleted");
            set_active_rules(count_rules(&accounts));
            return Ok(());
        }
        let rule: Arc<dyn ComplianceRule> = match self.builder.build(&entry.schema) {
            Ok(rule) => Arc::from(rule),
            Err(e) => {
                error!(
                    rule_id = entry.id,
                    schema = %entry.schema.name(),
                    error = %e,
                    "Failed to compile compliance rule"
                );
                return Err(e);
            }
        };
        for rules in accounts.values_mut() {
            rules.rules.retain(|compiled| compiled.entry.id != entry.id);
        }
        let account = accounts.entry(entry.directory_entry.clone()).or_default();
        for order in &account.orders {
            if let Err(e) = rule.add(order) {
                warn!(
                    rule_id = entry.id,
                    order_id = %order.id(),
                    error = %e,
                    "Order replay failed"
                );
            }
        }
        info!(
            rule_id = entry.id,
            account = %entry.directory_entry,
            state = %entry.state,
            schema = %entry.schema.name(),
            "Compliance rule installed"
        );
        account.rules.push(Arc::new(CompiledRule { entry, rule }));
        set_active_rules(count_rules(&accounts));
        Ok(())
    }

    /// Check a submission against the account's rules.
    ///
    /// The order is remembered for the account whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns the error of the first active rule that rejects.
    pub fn submit(&self, order: &Arc<Order>) -> Result<(), ComplianceError> {
        let rules = {
            let mut accounts = self.accounts.lock();
            let account = accounts.entry(order.fields().account.clone()).or_default();
            account.orders.push(Arc::clone(order));
            account.rules.clone()
        };
        self.check(Check::Submit, &rules, order)
    }

    /// Check a cancellation against the account's rules.
    ///
    /// # Errors
    ///
    /// Returns the error of the first active rule that rejects.
    pub fn cancel(&self, order: &Arc<Order>) -> Result<(), ComplianceError> {
        let rules = self.snapshot(&order.fields().account);
        self.check(Check::Cancel, &rules, order)
    }

    /// Register an order accepted elsewhere with every rule of its account,
    /// disabled ones included.
    ///
    /// # Errors
    ///
    /// Every rule is still notified; the first error is returned.
    pub fn add(&self, order: &Arc<Order>) -> Result<(), ComplianceError> {
        let rules = {
            let mut accounts = self.accounts.lock();
            let account = accounts.entry(order.fields().account.clone()).or_default();
            account.orders.push(Arc::clone(order));
            account.rules.clone()
        };
        let mut result = Ok(());
        for compiled in &rules {
            if let Err(e) = compiled.rule.add(order) {
                warn!(
                    rule_id = compiled.entry.id,
                    order_id = %order.id(),
                    error = %e,
                    "Add failed"
                );
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        record_check(
            "add",
            if result.is_ok() {
                CheckOutcome::Accepted
            } else {
                CheckOutcome::Error
            },
        );
        result
    }

    /// Every recorded violation, oldest first.
    #[must_use]
    pub fn violations(&self) -> Vec<ComplianceRuleViolationRecord> {
        self.violations.lock().clone()
    }

    /// The installed entries of `account`.
    #[must_use]
    pub fn entries(&self, account: &AccountId) -> Vec<ComplianceRuleEntry> {
        self.snapshot(account)
            .iter()
            .map(|compiled| compiled.entry.clone())
            .collect()
    }

    /// Number of installed entries across all accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        count_rules(&self.accounts.lock())
    }

    /// Returns true if no entry is installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find an installed entry by id.
    #[must_use]
    pub fn find(&self, id: ComplianceRuleId) -> Option<ComplianceRuleEntry> {
        self.accounts
            .lock()
            .values()
            .flat_map(|rules| rules.rules.iter())
            .find(|compiled| compiled.entry.id == id)
            .map(|compiled| compiled.entry.clone())
    }

    fn snapshot(&self, account: &AccountId) -> Vec<Arc<CompiledRule>> {
        self.accounts
            .lock()
            .get(account)
            .map(|rules| rules.rules.clone())
            .unwrap_or_default()
    }

    fn check(
        &self,
        check: Check,
        rules: &[Arc<CompiledRule>],
        order: &Order,
    ) -> Result<(), ComplianceError> {
        for compiled in rules {
            let state = compiled.entry.state;
            if state == ComplianceRuleEntryState::Disabled {
                continue;
            }
            let result = match check {
                Check::Submit => compiled.rule.submit(order),
                Check::Cancel => compiled.rule.cancel(order),
            };
            let Err(e) = result else {
                continue;
            };
            self.record(&compiled.entry, order, &e);
            if state == ComplianceRuleEntryState::Active {
                warn!(
                    operation = check.as_str(),
                    rule_id = compiled.entry.id,
                    order_id = %order.id(),
                    reason = %e,
                    "Compliance check rejected"
                );
                let outcome = if e.is_check_failure() {
                    CheckOutcome::Rejected
                } else {
                    CheckOutcome::Error
                };
                record_check(check.as_str(), outcome);
                return Err(e);
            }
            debug!(
                operation = check.as_str(),
                rule_id = compiled.entry.id,
                order_id = %order.id(),
                reason = %e,
                "Passive compliance violation"
            );
        }
        record_check(check.as_str(), CheckOutcome::Accepted);
        Ok(())
    }

    fn record(&self, entry: &ComplianceRuleEntry, order: &Order, error: &ComplianceError) {
        record_violation(entry.schema.name(), entry.state);
        self.violations.lock().push(ComplianceRuleViolationRecord {
            account: order.info().submission_account.clone(),
            order_id: order.id().clone(),
            rule_id: entry.id,
            schema_name: entry.schema.name().to_string(),
            reason: error.to_string(),
            timestamp: self.time_client.now(),
        });
    }
}

fn count_rules(accounts: &HashMap<AccountId, AccountRules>) -> usize {
    accounts.values().map(|rules| rules.rules.len()).sum()
}

impl fmt::Debug for ComplianceRuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComplianceRuleSet")
            .field("entries", &self.len())
            .field("violations", &self.violations.lock().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compliance::rules::order_count_limit::ORDER_COUNT_LIMIT_NAME;
    use crate::domain::compliance::rules::reject::{
        REJECT_CANCELS_NAME, REJECT_SUBMISSIONS_NAME,
    };
    use crate::domain::compliance::rules::testing::{at, limit_order, venues};
    use crate::domain::compliance::{ComplianceParameter, ComplianceRuleSchema};
    use crate::domain::order_execution::{OrderStatus, Side};
    use crate::domain::shared::Quantity;
    use crate::infrastructure::{
        FixedTimeClient, InMemoryDefinitionsClient, UnavailableMarketDataClient,
    };

    fn rule_set() -> ComplianceRuleSet {
        ComplianceRuleSet::new(ComplianceRuleBuilder::with_defaults(
            Arc::new(UnavailableMarketDataClient),
            Arc::new(InMemoryDefinitionsClient::new(venues())),
            Arc::new(FixedTimeClient::new(at(12, 0))),
        ))
    }

    fn entry(id: u64, state: ComplianceRuleEntryState, name: &str) -> ComplianceRuleEntry {
        ComplianceRuleEntry::new(id, "A", state, ComplianceRuleSchema::new(name, Vec::new()))
    }

    fn limit_entry(id: u64, limit: i64) -> ComplianceRuleEntry {
        ComplianceRuleEntry::new(
            id,
            "A",
            ComplianceRuleEntryState::Active,
            ComplianceRuleSchema::new(
                ORDER_COUNT_LIMIT_NAME,
                vec![ComplianceParameter::new("limit", Quantity::from_i64(limit))],
            ),
        )
    }

    fn order(account: &str) -> Arc<Order> {
        Arc::new(limit_order(account, Side::Bid, 10))
    }

    #[test]
    fn active_violation_blocks_and_is_recorded() {
        let rules = rule_set();
        rules
            .update(entry(1, ComplianceRuleEntryState::Active, REJECT_SUBMISSIONS_NAME))
            .unwrap();
        let order = order("A");
        assert!(rules.submit(&order).unwrap_err().is_check_failure());
        let violations = rules.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule_id, 1);
        assert_eq!(&violations[0].order_id, order.id());
        assert_eq!(violations[0].reason, "Submissions not permitted.");
        assert_eq!(violations[0].timestamp, at(12, 0));
    }

    #[test]
    fn passive_violation_is_recorded_only() {
        let rules = rule_set();
        rules
            .update(entry(1, ComplianceRuleEntryState::Passive, REJECT_SUBMISSIONS_NAME))
            .unwrap();
        assert!(rules.submit(&order("A")).is_ok());
        assert_eq!(rules.violations().len(), 1);
    }

    #[test]
    fn disabled_rule_is_skipped() {
        let rules = rule_set();
        rules
            .update(entry(1, ComplianceRuleEntryState::Disabled, REJECT_CANCELS_NAME))
            .unwrap();
        assert!(rules.cancel(&order("A")).is_ok());
        assert!(rules.violations().is_empty());
    }

    #[test]
    fn rules_apply_to_their_account_only() {
        let rules = rule_set();
        rules
            .update(entry(1, ComplianceRuleEntryState::Active, REJECT_SUBMISSIONS_NAME))
            .unwrap();
        assert!(rules.submit(&order("B")).is_ok());
    }

    #[test]
    fn deleted_entry_is_removed() {
        let rules = rule_set();
        rules
            .update(entry(1, ComplianceRuleEntryState::Active, REJECT_SUBMISSIONS_NAME))
            .unwrap();
        assert_eq!(rules.len(), 1);
        rules
            .update(entry(1, ComplianceRuleEntryState::Deleted, REJECT_SUBMISSIONS_NAME))
            .unwrap();
        assert!(rules.is_empty());
        assert!(rules.submit(&order("A")).is_ok());
    }

    #[test]
    fn update_replaces_entry_with_same_id() {
        let rules = rule_set();
        rules
            .update(entry(1, ComplianceRuleEntryState::Active, REJECT_SUBMISSIONS_NAME))
            .unwrap();
        rules
            .update(entry(1, ComplianceRuleEntryState::Active, REJECT_CANCELS_NAME))
            .unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(
            rules.find(1).map(|entry| entry.schema.name().to_string()),
            Some(REJECT_CANCELS_NAME.to_string())
        );
        assert!(rules.submit(&order("A")).is_ok());
    }

    #[test]
    fn failed_compile_keeps_previous_entry() {
        let rules = rule_set();
        rules
            .update(entry(1, ComplianceRuleEntryState::Active, REJECT_SUBMISSIONS_NAME))
            .unwrap();
        assert!(rules
            .update(entry(1, ComplianceRuleEntryState::Active, "missing"))
            .is_err());
        assert_eq!(
            rules.find(1).map(|entry| entry.schema.name().to_string()),
            Some(REJECT_SUBMISSIONS_NAME.to_string())
        );
    }

    #[test]
    fn new_rule_replays_remembered_orders() {
        let rules = rule_set();
        let open = order("A");
        rules.add(&open).unwrap();
        rules.update(limit_entry(1, 1)).unwrap();
        assert!(rules.submit(&order("A")).is_err());

        open.transition(OrderStatus::Canceled, at(12, 5));
        assert!(rules.submit(&order("A")).is_ok());
    }

    #[test]
    fn rejected_submission_does_not_count() {
        let rules = rule_set();
        rules.update(limit_entry(1, 1)).unwrap();
        assert!(rules.submit(&order("A")).is_ok());
        assert!(rules.submit(&order("A")).is_err());
        assert_eq!(rules.violations().len(), 1);
    }
}
