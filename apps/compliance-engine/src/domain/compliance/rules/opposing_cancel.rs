//! Cooldown on canceling after an opposite-side fill.

use std::sync::Arc;

use chrono::TimeDelta;
use parking_lot::Mutex;

use crate::domain::clients::TimeClient;
use crate::domain::compliance::{
    ComplianceError, ComplianceParameter, ComplianceRule, ComplianceRuleSchema,
};
use crate::domain::order_execution::{Order, ReportInbox, Side};
use crate::domain::shared::Timestamp;

/// Schema name of [`OpposingCancelComplianceRule`].
pub const OPPOSING_CANCEL_NAME: &str = "opposing_cancel";

/// Alternate schema name accepted for [`OpposingCancelComplianceRule`].
pub const OPPOSING_ORDER_CANCELLATION_NAME: &str = "opposing_order_cancellation";

/// Default schema of [`OpposingCancelComplianceRule`].
#[must_use]
pub fn opposing_cancel_schema() -> ComplianceRuleSchema {
    ComplianceRuleSchema::new(
        OPPOSING_CANCEL_NAME,
        vec![ComplianceParameter::new("timeout", TimeDelta::zero())],
    )
}

#[derive(Debug, Default)]
struct LastFills {
    ask: Option<Timestamp>,
    bid: Option<Timestamp>,
}

impl LastFills {
    const fn on(&self, side: Side) -> Option<Timestamp> {
        match side {
            Side::Ask => self.ask,
            Side::Bid => self.bid,
        }
    }

    fn record(&mut self, side: Side, timestamp: Timestamp) {
        match side {
            Side::Ask => self.ask = Some(timestamp),
            Side::Bid => self.bid = Some(timestamp),
        }
    }
}

/// Rejects canceling an order within `timeout` of the most recent fill on
/// the opposite side.
pub struct OpposingCancelComplianceRule {
    timeout: TimeDelta,
    time_client: Arc<dyn TimeClient>,
    last_fills: Mutex<LastFills>,
    reports: ReportInbox<Side>,
}

impl OpposingCancelComplianceRule {
    /// Create the rule.
    #[must_use]
    pub fn new(timeout: TimeDelta, time_client: Arc<dyn TimeClient>) -> Self {
        Self {
            timeout,
            time_client,
            last_fills: Mutex::new(LastFills::default()),
            reports: ReportInbox::new(),
        }
    }
}

impl ComplianceRule for OpposingCancelComplianceRule {
    fn cancel(&self, order: &Order) -> Result<(), ComplianceError> {
        let mut last_fills = self.last_fills.lock();
        for (side, report) in self.reports.drain() {
            if report.is_fill() {
                last_fills.record(side, report.timestamp);
            }
        }
        let now = self.time_client.now();
        let too_soon = last_fills
            .on(order.fields().side.opposite())
            .is_some_and(|last_fill| now.duration_since(last_fill) < self.timeout);
        if too_soon {
            return Err(ComplianceError::rejected(
                "Opposing order can not be canceled yet.",
            ));
        }
        Ok(())
    }

    fn add(&self, order: &Order) -> Result<(), ComplianceError> {
        order.monitor(self.reports.slot(order.fields().side));
        Ok(())
    }
}

impl std::fmt::Debug for OpposingCancelComplianceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpposingCancelComplianceRule")
            .field("timeout", &self.timeout)
            .field("last_fills", &*self.last_fills.lock())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compliance::rules::testing::{at, fill, limit_order};
    use crate::infrastructure::FixedTimeClient;

    #[test]
    fn cancel_rejected_within_timeout_of_opposite_fill() {
        let t0 = at(12, 0);
        let clock = Arc::new(FixedTimeClient::new(t0));
        let rule = OpposingCancelComplianceRule::new(
            TimeDelta::seconds(10),
            Arc::clone(&clock) as Arc<dyn TimeClient>,
        );
        let ask = limit_order("A", Side::Ask, 10);
        let bid = limit_order("A", Side::Bid, 9);
        assert!(rule.submit(&ask).is_ok());
        fill(&ask, 100, 10, t0);
        assert!(rule.submit(&bid).is_ok());

        clock.set(t0.saturating_add(TimeDelta::seconds(5)));
        assert!(rule.cancel(&bid).is_err());
        assert!(rule.cancel(&ask).is_ok());

        clock.set(t0.saturating_add(TimeDelta::seconds(10)));
        assert!(rule.cancel(&bid).is_ok());
    }

    #[test]
    fn cancel_allowed_without_fills() {
        let clock = Arc::new(FixedTimeClient::new(at(12, 0)));
        let rule = OpposingCancelComplianceRule::new(
            TimeDelta::seconds(10),
            Arc::clone(&clock) as Arc<dyn TimeClient>,
        );
        let bid = limit_order("A", Side::Bid, 9);
        assert!(rule.submit(&bid).is_ok());
        assert!(rule.cancel(&bid).is_ok());
    }
}
