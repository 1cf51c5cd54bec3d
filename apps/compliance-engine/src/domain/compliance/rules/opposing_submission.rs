//! Cooldown on submitting against a recently canceled opposite order.

use std::sync::Arc;

use chrono::TimeDelta;
use parking_lot::Mutex;

use crate::domain::clients::TimeClient;
use crate::domain::compliance::{
    ComplianceError, ComplianceParameter, ComplianceRule, ComplianceRuleSchema,
};
use crate::domain::order_execution::{
    ExecutionReport, Order, OrderFields, OrderStatus, OrderType, ReportInbox, Side,
};
use crate::domain::shared::{Money, Timestamp};

/// Schema name of [`OpposingSubmissionComplianceRule`].
pub const OPPOSING_SUBMISSION_NAME: &str = "opposing_submission";

/// Default schema of [`OpposingSubmissionComplianceRule`].
#[must_use]
pub fn opposing_submission_schema() -> ComplianceRuleSchema {
    ComplianceRuleSchema::new(
        OPPOSING_SUBMISSION_NAME,
        vec![
            ComplianceParameter::new("timeout", TimeDelta::zero()),
            ComplianceParameter::new("offset", Money::ZERO),
        ],
    )
}

/// Price an order would trade at if it crossed: the limit price, or the
/// most aggressive price for a market order.
fn submission_price(fields: &OrderFields) -> Money {
    match (fields.order_type, fields.side) {
        (OrderType::Limit, _) => fields.price,
        (_, Side::Ask) => Money::ZERO,
        (_, Side::Bid) => Money::MAX,
    }
}

/// Most competitive recent cancel per side.
#[derive(Debug)]
struct CancelTracking {
    ask_time: Timestamp,
    ask_price: Money,
    bid_time: Timestamp,
    bid_price: Money,
}

impl Default for CancelTracking {
    fn default() -> Self {
        Self {
            ask_time: Timestamp::MIN,
            ask_price: Money::MAX,
            bid_time: Timestamp::MIN,
            bid_price: Money::ZERO,
        }
    }
}

impl CancelTracking {
    fn record(
        &mut self,
        fields: &OrderFields,
        report: &ExecutionReport,
        now: Timestamp,
        timeout: TimeDelta,
    ) {
        let price = submission_price(fields);
        match fields.side {
            Side::Ask => {
                if now.duration_since(self.ask_time) > timeout {
                    self.ask_price = Money::MAX;
                }
                if report.timestamp >= self.ask_time && price <= self.ask_price {
                    self.ask_time = report.timestamp;
                    self.ask_price = price;
                }
            }
            Side::Bid => {
                if now.duration_since(self.bid_time) > timeout {
                    self.bid_price = Money::ZERO;
                }
                if report.timestamp >= self.bid_time && price >= self.bid_price {
                    self.bid_time = report.timestamp;
                    self.bid_price = price;
                }
            }
        }
    }

    /// Whether `fields` would trade within `offset` of the opposite side's
    /// tracked cancel price.
    fn in_range(&self, fields: &OrderFields, offset: Money) -> bool {
        let price = submission_price(fields);
        match fields.side {
            Side::Ask => price <= self.bid_price.saturating_add(offset),
            Side::Bid => price >= self.ask_price.saturating_sub(offset),
        }
    }

    const fn opposite_cancel_time(&self, side: Side) -> Timestamp {
        match side {
            Side::Ask => self.bid_time,
            Side::Bid => self.ask_time,
        }
    }
}

/// Rejects a submission priced within `offset` of an opposite-side order
/// canceled less than `timeout` ago.
///
/// Only limit and market orders are checked.
pub struct OpposingSubmissionComplianceRule {
    timeout: TimeDelta,
    offset: Money,
    time_client: Arc<dyn TimeClient>,
    tracking: Mutex<CancelTracking>,
    reports: ReportInbox<OrderFields>,
}

impl OpposingSubmissionComplianceRule {
    /// Create the rule.
    #[must_use]
    pub fn new(timeout: TimeDelta, offset: Money, time_client: Arc<dyn TimeClient>) -> Self {
        Self {
            timeout,
            offset,
            time_client,
            tracking: Mutex::new(CancelTracking::default()),
            reports: ReportInbox::new(),
        }
    }

    fn watch(&self, order: &Order) {
        order.monitor(self.reports.slot(order.fields().clone()));
    }
}

impl ComplianceRule for OpposingSubmissionComplianceRule {
    fn submit(&self, order: &Order) -> Result<(), ComplianceError> {
        let fields = order.fields();
        if !fields.order_type.is_priced() {
            return Ok(());
        }
        let now = self.time_client.now();
        {
            let mut tracking = self.tracking.lock();
            for (canceled, report) in self.reports.drain() {
                if report.status == OrderStatus::Canceled {
                    tracking.record(&canceled, &report, now, self.timeout);
                }
            }
            let cancel_time = tracking.opposite_cancel_time(fields.side);
            if tracking.in_range(fields, self.offset)
                && cancel_time >= now.saturating_sub(self.timeout)
            {
                return Err(ComplianceError::rejected(
                    "Opposing order can not be submitted yet.",
                ));
            }
        }
        self.watch(order);
        Ok(())
    }

    fn add(&self, order: &Order) -> Result<(), ComplianceError> {
        if order.fields().order_type.is_priced() {
            self.watch(order);
        }
        Ok(())
    }
}

impl std::fmt::Debug for OpposingSubmissionComplianceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpposingSubmissionComplianceRule")
            .field("timeout", &self.timeout)
            .field("offset", &self.offset)
            .field("tracking", &*self.tracking.lock())
            .finish_non_exhaustive()
    }
}
