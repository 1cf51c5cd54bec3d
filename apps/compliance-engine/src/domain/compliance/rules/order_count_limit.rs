//! Cap on the number of open orders.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crate::domain::compliance::{
    ComplianceError, ComplianceParameter, ComplianceRule, ComplianceRuleSchema,
};
use crate::domain::order_execution::Order;
use crate::domain::shared::Quantity;

/// Schema name of [`OrderCountLimitComplianceRule`].
pub const ORDER_COUNT_LIMIT_NAME: &str = "order_count_limit";

/// Default schema of [`OrderCountLimitComplianceRule`].
#[must_use]
pub fn order_count_limit_schema() -> ComplianceRuleSchema {
    ComplianceRuleSchema::new(
        ORDER_COUNT_LIMIT_NAME,
        vec![ComplianceParameter::new("limit", Quantity::ZERO)],
    )
}

/// Rejects a submission that would take the number of open orders above
/// `limit`. An order stops counting once its report stream reaches a
/// terminal status.
#[derive(Debug)]
pub struct OrderCountLimitComplianceRule {
    limit: u64,
    open_orders: Arc<AtomicU64>,
}

impl OrderCountLimitComplianceRule {
    /// Create a rule admitting at most `limit` open orders.
    #[must_use]
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            open_orders: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of orders currently counted as open.
    #[must_use]
    pub fn open_orders(&self) -> u64 {
        self.open_orders.load(Ordering::SeqCst)
    }

    fn track(&self, order: &Order) {
        let counter = Arc::downgrade(&self.open_orders);
        order.monitor(Box::new(move |report| {
            if !report.status.is_terminal() {
                return true;
            }
            if let Some(counter) = Weak::upgrade(&counter) {
                counter.fetch_sub(1, Ordering::SeqCst);
            }
            false
        }));
    }
}

impl ComplianceRule for OrderCountLimitComplianceRule {
    fn submit(&self, order: &Order) -> Result<(), ComplianceError> {
        let count = self.open_orders.fetch_add(1, Ordering::SeqCst) + 1;
        if count > self.limit {
            self.open_orders.fetch_sub(1, Ordering::SeqCst);
            return Err(ComplianceError::rejected("Order count limit exceeded."));
        }
        self.track(order);
        Ok(())
    }

    fn add(&self, order: &Order) -> Result<(), ComplianceError> {
        self.open_orders.fetch_add(1, Ordering::SeqCst);
        self.track(order);
        Ok(())
    }
}
