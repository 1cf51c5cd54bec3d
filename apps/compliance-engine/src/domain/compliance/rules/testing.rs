//! Fixtures shared by the rule tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{TimeZone, Utc};

use crate::domain::compliance::{ComplianceError, ComplianceRule};
use crate::domain::order_execution::{
    ExecutionReport, Order, OrderFields, OrderInfo, OrderStatus, Side,
};
use crate::domain::reference_data::{VenueDatabase, VenueEntry};
use crate::domain::shared::{Money, OrderId, Quantity, Security, Timestamp};

/// 2024-01-15 at `hour:minute` UTC.
pub fn at(hour: u32, minute: u32) -> Timestamp {
    Timestamp::new(Utc.with_ymd_and_hms(2024, 1, 15, hour, minute, 0).unwrap())
}

pub fn aapl() -> Security {
    Security::new("AAPL", "XNAS", "US")
}

pub fn limit_order_on(account: &str, security: Security, side: Side, price: i64) -> Order {
    let fields = OrderFields::limit(
        account,
        security,
        "USD",
        side,
        Quantity::from_i64(100),
        Money::from_units(price),
    );
    Order::new(OrderInfo::new(OrderId::generate(), fields, at(12, 0)))
}

pub fn limit_order(account: &str, side: Side, price: i64) -> Order {
    limit_order_on(account, aapl(), side, price)
}

pub fn market_order(account: &str, side: Side) -> Order {
    let fields = OrderFields::market(account, aapl(), "USD", side, Quantity::from_i64(100));
    Order::new(OrderInfo::new(OrderId::generate(), fields, at(12, 0)))
}

pub fn fill(order: &Order, quantity: i64, price: i64, timestamp: Timestamp) {
    let previous = order.last_report().unwrap();
    order.update(
        ExecutionReport::updated(&previous, OrderStatus::PartiallyFilled, timestamp)
            .with_fill(Quantity::from_i64(quantity), Money::from_units(price)),
    );
}

pub fn venues() -> VenueDatabase {
    [
        VenueEntry::new("XNAS", "US", "America/New_York"),
        VenueEntry::new("XTSE", "CA", "America/Toronto"),
        VenueEntry::new("XBAD", "ZZ", "Not/AZone"),
    ]
    .into_iter()
    .collect()
}

/// Counts the calls it receives and accepts everything.
#[derive(Debug, Default)]
pub struct RecordingRule {
    submits: AtomicUsize,
    cancels: AtomicUsize,
    adds: AtomicUsize,
}

impl RecordingRule {
    /// `(submits, cancels, adds)`.
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.submits.load(Ordering::SeqCst),
            self.cancels.load(Ordering::SeqCst),
            self.adds.load(Ordering::SeqCst),
        )
    }
}

impl ComplianceRule for RecordingRule {
    fn submit(&self, _order: &Order) -> Result<(), ComplianceError> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn cancel(&self, _order: &Order) -> Result<(), ComplianceError> {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn add(&self, _order: &Order) -> Result<(), ComplianceError> {
        self.adds.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
