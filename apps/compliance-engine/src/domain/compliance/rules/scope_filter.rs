//! Gate an inner rule by the order's scope.

use std::sync::Arc;

use tracing::debug;

use crate::domain::compliance::{
    ComplianceError, ComplianceParameter, ComplianceRule, ComplianceRuleSchema, ComplianceValue,
    wrap,
};
use crate::domain::order_execution::Order;
use crate::domain::reference_data::{Scope, VenueDatabase};
use crate::domain::shared::Security;

/// Schema name of [`ScopeFilterComplianceRule`].
pub const SCOPE_FILTER_NAME: &str = "scope_filter";

/// Schema of a [`ScopeFilterComplianceRule`] applying `schema` to the
/// markets selected by `selectors`.
#[must_use]
pub fn scope_filter_schema(
    selectors: Vec<Security>,
    schema: &ComplianceRuleSchema,
) -> ComplianceRuleSchema {
    let selectors = selectors.into_iter().map(ComplianceValue::Security).collect();
    wrap(
        SCOPE_FILTER_NAME,
        vec![ComplianceParameter::new("scope", ComplianceValue::List(selectors))],
        schema,
    )
}

/// Applies the inner rule only to orders whose ticker lies in a scope.
///
/// Orders outside the scope are still registered with the inner rule.
pub struct ScopeFilterComplianceRule {
    scope: Scope,
    venues: Arc<VenueDatabase>,
    inner: Box<dyn ComplianceRule>,
}

impl ScopeFilterComplianceRule {
    /// Create the decorator.
    #[must_use]
    pub fn new(scope: Scope, venues: Arc<VenueDatabase>, inner: Box<dyn ComplianceRule>) -> Self {
        Self {
            scope,
            venues,
            inner,
        }
    }

    fn applies_to(&self, order: &Order) -> bool {
        self.scope
            .contains_ticker(&order.fields().security.ticker(), &self.venues)
    }
}

impl ComplianceRule for ScopeFilterComplianceRule {
    fn submit(&self, order: &Order) -> Result<(), ComplianceError> {
        if self.applies_to(order) {
            self.inner.submit(order)
        } else {
            debug!(order_id = %order.id(), scope = %self.scope, "Order outside scope");
            self.add(order)
        }
    }

    fn cancel(&self, order: &Order) -> Result<(), ComplianceError> {
        if self.applies_to(order) {
            self.inner.cancel(order)
        } else {
            Ok(())
        }
    }

    fn add(&self, order: &Order) -> Result<(), ComplianceError> {
        self.inner.add(order)
    }
}

impl std::fmt::Debug for ScopeFilterComplianceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeFilterComplianceRule")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compliance::rules::testing::{RecordingRule, limit_order, venues};
    use crate::domain::order_execution::Side;

    #[test]
    fn gates_on_scope() {
        let inner = Arc::new(RecordingRule::default());
        let rule = ScopeFilterComplianceRule::new(
            Scope::from_country("US"),
            Arc::new(venues()),
            Box::new(Arc::clone(&inner)),
        );
        let order = limit_order("A", Side::Bid, 10);
        assert!(rule.submit(&order).is_ok());
        assert!(rule.cancel(&order).is_ok());
        assert_eq!(inner.counts(), (1, 1, 0));

        let outside = ScopeFilterComplianceRule::new(
            Scope::from_venue("XTSE"),
            Arc::new(venues()),
            Box::new(Arc::clone(&inner)),
        );
        assert!(outside.submit(&order).is_ok());
        assert!(outside.cancel(&order).is_ok());
        assert_eq!(inner.counts(), (1, 1, 1));
    }
}
