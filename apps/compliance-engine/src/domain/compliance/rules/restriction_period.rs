//! Region-scoped restricted hours for submissions or cancellations.

use std::sync::Arc;

use chrono::TimeDelta;
use chrono_tz::Tz;

use crate::domain::clients::TimeClient;
use crate::domain::compliance::{
    ComplianceError, ComplianceParameter, ComplianceRule, ComplianceRuleSchema, ComplianceValue,
    TimeWindow,
};
use crate::domain::order_execution::Order;
use crate::domain::reference_data::Region;

/// Schema name of [`CancelRestrictionPeriodComplianceRule`].
pub const CANCEL_RESTRICTION_PERIOD_NAME: &str = "cancel_restriction_period";

/// Schema name of [`SubmissionRestrictionPeriodComplianceRule`].
pub const SUBMISSION_RESTRICTION_PERIOD_NAME: &str = "submission_restriction_period";

fn restriction_period_schema(name: &str) -> ComplianceRuleSchema {
    ComplianceRuleSchema::new(
        name,
        vec![
            ComplianceParameter::new("region", ComplianceValue::List(Vec::new())),
            ComplianceParameter::new("start_period", TimeDelta::zero()),
            ComplianceParameter::new("end_period", TimeDelta::zero()),
            ComplianceParameter::new("time_zone", "UTC"),
        ],
    )
}

/// Default schema of [`CancelRestrictionPeriodComplianceRule`].
#[must_use]
pub fn cancel_restriction_period_schema() -> ComplianceRuleSchema {
    restriction_period_schema(CANCEL_RESTRICTION_PERIOD_NAME)
}

/// Default schema of [`SubmissionRestrictionPeriodComplianceRule`].
#[must_use]
pub fn submission_restriction_period_schema() -> ComplianceRuleSchema {
    restriction_period_schema(SUBMISSION_RESTRICTION_PERIOD_NAME)
}

/// A daily window during which orders in a region are restricted.
///
/// The window is evaluated in a single configured time zone, independent of
/// the order's venue.
pub struct RestrictionPeriod {
    region: Region,
    window: TimeWindow,
    time_zone: Tz,
    time_client: Arc<dyn TimeClient>,
}

impl RestrictionPeriod {
    /// Create a restriction period.
    #[must_use]
    pub fn new(
        region: Region,
        window: TimeWindow,
        time_zone: Tz,
        time_client: Arc<dyn TimeClient>,
    ) -> Self {
        Self {
            region,
            window,
            time_zone,
            time_client,
        }
    }

    /// Returns true iff `order` is in the region and the current time is
    /// within the window.
    #[must_use]
    pub fn is_restricted(&self, order: &Order) -> bool {
        if !self.region.contains_security(&order.fields().security) {
            return false;
        }
        let time = self.time_client.now().time_of_day_in(self.time_zone);
        self.window.contains(time)
    }
}

impl std::fmt::Debug for RestrictionPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestrictionPeriod")
            .field("region", &self.region)
            .field("window", &self.window)
            .field("time_zone", &self.time_zone)
            .finish_non_exhaustive()
    }
}

/// Rejects cancellations of orders in a region during restricted hours.
#[derive(Debug)]
pub struct CancelRestrictionPeriodComplianceRule {
    period: RestrictionPeriod,
}

impl CancelRestrictionPeriodComplianceRule {
    /// Create the rule.
    #[must_use]
    pub const fn new(period: RestrictionPeriod) -> Self {
        Self { period }
    }
}

impl ComplianceRule for CancelRestrictionPeriodComplianceRule {
    fn cancel(&self, order: &Order) -> Result<(), ComplianceError> {
        if self.period.is_restricted(order) {
            return Err(ComplianceError::rejected(
                "Cancels not permitted during this period.",
            ));
        }
        Ok(())
    }
}

/// Rejects submissions of orders in a region during restricted hours.
#[derive(Debug)]
pub struct SubmissionRestrictionPeriodComplianceRule {
    period: RestrictionPeriod,
}

impl SubmissionRestrictionPeriodComplianceRule {
    /// Create the rule.
    #[must_use]
    pub const fn new(period: RestrictionPeriod) -> Self {
        Self { period }
    }
}

impl ComplianceRule for SubmissionRestrictionPeriodComplianceRule {
    fn submit(&self, order: &Order) -> Result<(), ComplianceError> {
        if self.period.is_restricted(order) {
            return Err(ComplianceError::rejected(
                "Submissions not permitted during this period.",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compliance::rules::testing::{at, limit_order, limit_order_on};
    use crate::domain::order_execution::Side;
    use crate::domain::shared::Security;
    use crate::infrastructure::FixedTimeClient;

    fn period(clock: &Arc<FixedTimeClient>) -> RestrictionPeriod {
        RestrictionPeriod::new(
            Region::from_country("US"),
            TimeWindow::new(TimeDelta::hours(9), TimeDelta::hours(10)),
            Tz::UTC,
            Arc::clone(clock) as Arc<dyn TimeClient>,
        )
    }

    #[test]
    fn cancel_rejected_inside_window_and_region() {
        let clock = Arc::new(FixedTimeClient::new(at(9, 30)));
        let rule = CancelRestrictionPeriodComplianceRule::new(period(&clock));
        let order = limit_order("A", Side::Bid, 10);
        assert!(rule.cancel(&order).is_err());
        assert!(rule.submit(&order).is_ok());

        clock.set(at(10, 1));
        assert!(rule.cancel(&order).is_ok());
    }

    #[test]
    fn orders_outside_region_are_never_checked() {
        let clock = Arc::new(FixedTimeClient::new(at(9, 30)));
        let rule = SubmissionRestrictionPeriodComplianceRule::new(period(&clock));
        let order = limit_order_on("A", Security::new("RY", "XTSE", "CA"), Side::Bid, 10);
        assert!(rule.submit(&order).is_ok());
        assert!(rule.submit(&limit_order("A", Side::Bid, 10)).is_err());
    }

    #[test]
    fn window_is_evaluated_in_configured_zone() {
        // 14:30 UTC is 09:30 in New York during standard time.
        let clock = Arc::new(FixedTimeClient::new(at(14, 30)));
        let rule = SubmissionRestrictionPeriodComplianceRule::new(RestrictionPeriod::new(
            Region::global(),
            TimeWindow::new(TimeDelta::hours(9), TimeDelta::hours(10)),
            chrono_tz::America::New_York,
            Arc::clone(&clock) as Arc<dyn TimeClient>,
        ));
        assert!(rule.submit(&limit_order("A", Side::Bid, 10)).is_err());
    }
}
