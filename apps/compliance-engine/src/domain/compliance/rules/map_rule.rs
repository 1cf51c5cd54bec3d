//! Per-key rule multiplexers.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use crate::domain::compliance::{ComplianceError, ComplianceRule, ComplianceRuleSchema, wrap};
use crate::domain::order_execution::Order;
use crate::domain::shared::{AccountId, Security};

/// Schema name of [`PerAccountComplianceRule`].
pub const PER_ACCOUNT_NAME: &str = "per_account";

/// Schema name of [`PerSecurityComplianceRule`].
pub const PER_SECURITY_NAME: &str = "per_security";

/// Builds a child rule from a schema.
pub type RuleFactory = Arc<
    dyn Fn(&ComplianceRuleSchema) -> Result<Box<dyn ComplianceRule>, ComplianceError>
        + Send
        + Sync,
>;

/// Schema of a [`PerAccountComplianceRule`] owning one `schema` rule per
/// account.
#[must_use]
pub fn per_account_schema(schema: &ComplianceRuleSchema) -> ComplianceRuleSchema {
    wrap(PER_ACCOUNT_NAME, Vec::new(), schema)
}

/// Schema of a [`PerSecurityComplianceRule`] owning one `schema` rule per
/// security.
#[must_use]
pub fn per_security_schema(schema: &ComplianceRuleSchema) -> ComplianceRuleSchema {
    wrap(PER_SECURITY_NAME, Vec::new(), schema)
}

/// Owns an independent child rule per key, built lazily from a schema the
/// first time an order with that key is seen.
///
/// Concurrent first use of a key builds exactly one child. A child whose
/// construction fails is not cached.
pub struct MapComplianceRule<K> {
    schema: ComplianceRuleSchema,
    rule_builder: RuleFactory,
    key_builder: Box<dyn Fn(&Order) -> K + Send + Sync>,
    rules: DashMap<K, Arc<dyn ComplianceRule>>,
}

/// One child rule per account.
pub type PerAccountComplianceRule = MapComplianceRule<AccountId>;

/// One child rule per security.
pub type PerSecurityComplianceRule = MapComplianceRule<Security>;

impl<K> MapComplianceRule<K>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
{
    /// Create a multiplexer keyed by `key_builder`.
    #[must_use]
    pub fn new(
        schema: ComplianceRuleSchema,
        rule_builder: RuleFactory,
        key_builder: impl Fn(&Order) -> K + Send + Sync + 'static,
    ) -> Self {
        Self {
            schema,
            rule_builder,
            key_builder: Box::new(key_builder),
            rules: DashMap::new(),
        }
    }

    /// Number of child rules built so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no child rule has been built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Drop every child rule; they are rebuilt on next use.
    pub fn clear(&self) {
        self.rules.clear();
    }

    fn find(&self, key: &K) -> Option<Arc<dyn ComplianceRule>> {
        self.rules.get(key).map(|rule| Arc::clone(rule.value()))
    }

    fn load(&self, key: K) -> Result<Arc<dyn ComplianceRule>, ComplianceError> {
        if let Some(rule) = self.find(&key) {
            return Ok(rule);
        }
        match self.rules.entry(key) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                debug!(key = ?entry.key(), schema = %self.schema.name(), "Building child rule");
                let rule: Arc<dyn ComplianceRule> =
                    Arc::from((self.rule_builder)(&self.schema)?);
                entry.insert(Arc::clone(&rule));
                Ok(rule)
            }
        }
    }
}

impl PerAccountComplianceRule {
    /// One `schema` rule per account.
    #[must_use]
    pub fn per_account(schema: ComplianceRuleSchema, rule_builder: RuleFactory) -> Self {
        Self::new(schema, rule_builder, |order| order.fields().account.clone())
    }
}

impl PerSecurityComplianceRule {
    /// One `schema` rule per security.
    #[must_use]
    pub fn per_security(schema: ComplianceRuleSchema, rule_builder: RuleFactory) -> Self {
        Self::new(schema, rule_builder, |order| order.fields().security.clone())
    }
}

impl<K> ComplianceRule for MapComplianceRule<K>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
{
    fn submit(&self, order: &Order) -> Result<(), ComplianceError> {
        self.load((self.key_builder)(order))?.submit(order)
    }

    fn cancel(&self, order: &Order) -> Result<(), ComplianceError> {
        match self.find(&(self.key_builder)(order)) {
            Some(rule) => rule.cancel(order),
            None => Ok(()),
        }
    }

    fn add(&self, order: &Order) -> Result<(), ComplianceError> {
        self.load((self.key_builder)(order))?.add(order)
    }
}

impl<K: Eq + Hash> fmt::Debug for MapComplianceRule<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapComplianceRule")
            .field("schema", &self.schema)
            .field("children", &self.rules.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::domain::compliance::SchemaError;
    use crate::domain::compliance::rules::order_count_limit::{
        OrderCountLimitComplianceRule, order_count_limit_schema,
    };
    use crate::domain::compliance::rules::testing::limit_order;
    use crate::domain::order_execution::Side;

    fn counting_factory(built: &Arc<AtomicUsize>, limit: u64) -> RuleFactory {
        let built = Arc::clone(built);
        Arc::new(move |_schema| {
            built.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(OrderCountLimitComplianceRule::new(limit)) as Box<dyn ComplianceRule>)
        })
    }

    #[test]
    fn keys_are_isolated() {
        let built = Arc::new(AtomicUsize::new(0));
        let rule = PerAccountComplianceRule::per_account(
            order_count_limit_schema(),
            counting_factory(&built, 1),
        );
        assert!(rule.submit(&limit_order("A", Side::Bid, 10)).is_ok());
        assert!(rule.submit(&limit_order("A", Side::Bid, 10)).is_err());
        assert!(rule.submit(&limit_order("B", Side::Bid, 10)).is_ok());
        assert_eq!(rule.len(), 2);
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn cancel_without_child_is_noop() {
        let built = Arc::new(AtomicUsize::new(0));
        let rule = PerAccountComplianceRule::per_account(
            order_count_limit_schema(),
            counting_factory(&built, 1),
        );
        assert!(rule.cancel(&limit_order("A", Side::Bid, 10)).is_ok());
        assert!(rule.is_empty());
        assert_eq!(built.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failed_build_is_not_cached() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let factory: RuleFactory = Arc::new(move |schema| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(SchemaError::UnknownRule {
                name: schema.name().to_string(),
            }
            .into())
        });
        let rule = PerAccountComplianceRule::per_account(order_count_limit_schema(), factory);
        let order = limit_order("A", Side::Bid, 10);
        assert!(matches!(rule.submit(&order), Err(ComplianceError::Schema(_))));
        assert!(matches!(rule.add(&order), Err(ComplianceError::Schema(_))));
        assert!(rule.is_empty());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn concurrent_first_use_builds_one_child() {
        let built = Arc::new(AtomicUsize::new(0));
        let rule = PerSecurityComplianceRule::per_security(
            order_count_limit_schema(),
            counting_factory(&built, 100),
        );
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    let order = limit_order("A", Side::Bid, 10);
                    assert!(rule.submit(&order).is_ok());
                });
            }
        });
        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert_eq!(rule.len(), 1);
    }

    #[test]
    fn clear_rebuilds_children() {
        let built = Arc::new(AtomicUsize::new(0));
        let rule = PerAccountComplianceRule::per_account(
            order_count_limit_schema(),
            counting_factory(&built, 1),
        );
        assert!(rule.submit(&limit_order("A", Side::Bid, 10)).is_ok());
        rule.clear();
        assert!(rule.submit(&limit_order("A", Side::Bid, 10)).is_ok());
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }
}
