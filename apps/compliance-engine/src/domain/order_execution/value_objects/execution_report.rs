//! Execution report published for an order.

use serde::{Deserialize, Serialize};

use super::OrderStatus;
use crate::domain::shared::{Money, OrderId, Quantity, Timestamp};

/// Asynchronous status update for an order.
///
/// Reports form a sequence per order: the first report carries sequence 0 and
/// status [`OrderStatus::PendingNew`], every subsequent report increments the
/// sequence by one. `last_quantity`/`last_price` are non-zero only on fills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Order the report belongs to.
    pub id: OrderId,
    /// Position of the report within the order's report stream.
    pub sequence: u64,
    /// Time the report was generated.
    pub timestamp: Timestamp,
    /// Order status after this report.
    pub status: OrderStatus,
    /// Quantity filled by this report.
    pub last_quantity: Quantity,
    /// Price of the fill carried by this report.
    pub last_price: Money,
    /// Free-form text (reject reason, venue message).
    pub text: String,
}

impl ExecutionReport {
    /// Builds the first report of an order.
    #[must_use]
    pub fn initial(id: OrderId, timestamp: Timestamp) -> Self {
        Self {
            id,
            sequence: 0,
            timestamp,
            status: OrderStatus::PendingNew,
            last_quantity: Quantity::ZERO,
            last_price: Money::ZERO,
            text: String::new(),
        }
    }

    /// Builds the report following `previous`.
    #[must_use]
    pub fn updated(previous: &Self, status: OrderStatus, timestamp: Timestamp) -> Self {
        Self {
            id: previous.id.clone(),
            sequence: previous.sequence + 1,
            timestamp,
            status,
            last_quantity: Quantity::ZERO,
            last_price: Money::ZERO,
            text: String::new(),
        }
    }

    /// Attaches a fill to the report.
    #[must_use]
    pub fn with_fill(mut self, quantity: Quantity, price: Money) -> Self {
        self.last_quantity = quantity;
        self.last_price = price;
        self
    }

    /// Attaches free-form text to the report.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Returns true if this report carries a fill.
    #[must_use]
    pub fn is_fill(&self) -> bool {
        !self.last_quantity.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_report_is_pending_new() {
        let report = ExecutionReport::initial(OrderId::new("ord-1"), Timestamp::now());
        assert_eq!(report.sequence, 0);
        assert_eq!(report.status, OrderStatus::PendingNew);
        assert!(!report.is_fill());
    }

    #[test]
    fn updated_report_increments_sequence() {
        let initial = ExecutionReport::initial(OrderId::new("ord-1"), Timestamp::now());
        let filled = ExecutionReport::updated(&initial, OrderStatus::Filled, Timestamp::now())
            .with_fill(Quantity::from_i64(100), Money::from_units(10));
        assert_eq!(filled.sequence, 1);
        assert_eq!(filled.id, initial.id);
        assert!(filled.is_fill());
    }
}
