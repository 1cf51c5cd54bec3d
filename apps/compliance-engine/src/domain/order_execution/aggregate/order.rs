//! Order Aggregate Root
//!
//! An order is immutable once submitted; its only mutable part is the stream
//! of execution reports the venue publishes for it. Compliance rules observe
//! that stream by subscribing a [`ReportSink`].

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::domain::order_execution::value_objects::{
    ExecutionReport, OrderStatus, OrderType, Side,
};
use crate::domain::shared::{AccountId, CurrencyId, Money, OrderId, Quantity, Security, Timestamp};

/// Receives every report published for an order.
///
/// Returns `false` once the subscriber is gone; the order then drops the sink.
pub type ReportSink = Box<dyn FnMut(&ExecutionReport) -> bool + Send>;

/// Fields supplied by the submitter of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFields {
    /// Account the order trades for.
    pub account: AccountId,
    /// Security being traded.
    pub security: Security,
    /// Currency the price is denominated in.
    pub currency: CurrencyId,
    /// Order type.
    pub order_type: OrderType,
    /// Order side.
    pub side: Side,
    /// Quantity to trade.
    pub quantity: Quantity,
    /// Limit price (ignored for market orders).
    pub price: Money,
}

impl OrderFields {
    /// Fields for a limit order.
    #[must_use]
    pub fn limit(
        account: impl Into<AccountId>,
        security: Security,
        currency: impl Into<CurrencyId>,
        side: Side,
        quantity: Quantity,
        price: Money,
    ) -> Self {
        Self {
            account: account.into(),
            security,
            currency: currency.into(),
            order_type: OrderType::Limit,
            side,
            quantity,
            price,
        }
    }

    /// Fields for a market order.
    #[must_use]
    pub fn market(
        account: impl Into<AccountId>,
        security: Security,
        currency: impl Into<CurrencyId>,
        side: Side,
        quantity: Quantity,
    ) -> Self {
        Self {
            account: account.into(),
            security,
            currency: currency.into(),
            order_type: OrderType::Market,
            side,
            quantity,
            price: Money::ZERO,
        }
    }
}

/// Identity and submission details of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInfo {
    /// Order identifier.
    pub id: OrderId,
    /// Submitted fields.
    pub fields: OrderFields,
    /// Account that submitted the order (may differ from `fields.account`).
    pub submission_account: AccountId,
    /// Submission time.
    pub timestamp: Timestamp,
}

impl OrderInfo {
    /// Submission details for an order submitted by its own account.
    #[must_use]
    pub fn new(id: OrderId, fields: OrderFields, timestamp: Timestamp) -> Self {
        let submission_account = fields.account.clone();
        Self {
            id,
            fields,
            submission_account,
            timestamp,
        }
    }
}

#[derive(Default)]
struct ReportPublisher {
    history: Vec<ExecutionReport>,
    sinks: Vec<ReportSink>,
}

/// Order Aggregate Root.
///
/// Reports are delivered to sinks in publication order. A sink added with
/// [`Order::monitor`] first receives every report already published, so a
/// late subscriber still observes a terminal status.
pub struct Order {
    info: OrderInfo,
    publisher: Mutex<ReportPublisher>,
}

impl Order {
    /// Create an order whose stream starts with a `PENDING_NEW` report.
    #[must_use]
    pub fn new(info: OrderInfo) -> Self {
        let initial = ExecutionReport::initial(info.id.clone(), info.timestamp);
        Self {
            info,
            publisher: Mutex::new(ReportPublisher {
                history: vec![initial],
                sinks: Vec::new(),
            }),
        }
    }

    /// Submission details.
    #[must_use]
    pub const fn info(&self) -> &OrderInfo {
        &self.info
    }

    /// Order identifier.
    #[must_use]
    pub const fn id(&self) -> &OrderId {
        &self.info.id
    }

    /// Submitted fields.
    #[must_use]
    pub const fn fields(&self) -> &OrderFields {
        &self.info.fields
    }

    /// Status carried by the most recent report.
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.publisher
            .lock()
            .history
            .last()
            .map_or(OrderStatus::PendingNew, |report| report.status)
    }

    /// Every report published so far.
    #[must_use]
    pub fn reports(&self) -> Vec<ExecutionReport> {
        self.publisher.lock().history.clone()
    }

    /// The most recent report.
    #[must_use]
    pub fn last_report(&self) -> Option<ExecutionReport> {
        self.publisher.lock().history.last().cloned()
    }

    /// Publish a report to every subscribed sink.
    pub fn update(&self, report: ExecutionReport) {
        let mut publisher = self.publisher.lock();
        publisher.sinks.retain_mut(|sink| sink(&report));
        publisher.history.push(report);
    }

    /// Publish the report following the most recent one with `status`.
    pub fn transition(&self, status: OrderStatus, timestamp: Timestamp) -> ExecutionReport {
        let report = match self.last_report() {
            Some(previous) => ExecutionReport::updated(&previous, status, timestamp),
            None => ExecutionReport::initial(self.info.id.clone(), timestamp),
        };
        self.update(report.clone());
        report
    }

    /// Subscribe `sink`, replaying the reports already published.
    pub fn monitor(&self, mut sink: ReportSink) {
        let mut publisher = self.publisher.lock();
        for report in &publisher.history {
            if !sink(report) {
                return;
            }
        }
        publisher.sinks.push(sink);
    }
}

impl std::fmt::Debug for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Order")
            .field("info", &self.info)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}
