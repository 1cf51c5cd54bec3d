//! Gate an inner rule by the venue-local time of day.

use std::sync::Arc;

use chrono::TimeDelta;
use chrono_tz::Tz;
use dashmap::DashMap;
use tracing::debug;

use crate::domain::clients::TimeClient;
use crate::domain::compliance::{
    ComplianceError, ComplianceParameter, ComplianceRule, ComplianceRuleSchema, TimeWindow, wrap,
};
use crate::domain::order_execution::Order;
use crate::domain::reference_data::VenueDatabase;
use crate::domain::shared::VenueCode;

/// Schema name of [`TimeFilterComplianceRule`].
pub const TIME_FILTER_NAME: &str = "time_filter";

/// Schema of a [`TimeFilterComplianceRule`] applying `schema` between
/// `start` and `end` (offsets since local midnight).
#[must_use]
pub fn time_filter_schema(
    start: TimeDelta,
    end: TimeDelta,
    schema: &ComplianceRuleSchema,
) -> ComplianceRuleSchema {
    wrap(
        TIME_FILTER_NAME,
        vec![
            ComplianceParameter::new("start_period", start),
            ComplianceParameter::new("end_period", end),
        ],
        schema,
    )
}

/// Applies the inner rule only while the time of day at the order's venue
/// lies within a window.
///
/// Venue time zones are resolved on first use and cached. A venue without a
/// usable time zone is a reference data error, not a rejection.
pub struct TimeFilterComplianceRule {
    window: TimeWindow,
    venues: Arc<VenueDatabase>,
    time_zones: DashMap<VenueCode, Tz>,
    time_client: Arc<dyn TimeClient>,
    inner: Box<dyn ComplianceRule>,
}

impl TimeFilterComplianceRule {
    /// Create the decorator.
    #[must_use]
    pub fn new(
        window: TimeWindow,
        venues: Arc<VenueDatabase>,
        time_client: Arc<dyn TimeClient>,
        inner: Box<dyn ComplianceRule>,
    ) -> Self {
        Self {
            window,
            venues,
            time_zones: DashMap::new(),
            time_client,
            inner,
        }
    }

    fn time_zone(&self, venue: &VenueCode) -> Result<Tz, ComplianceError> {
        if let Some(time_zone) = self.time_zones.get(venue) {
            return Ok(*time_zone);
        }
        let name = self
            .venues
            .time_zone_of(venue)
            .ok_or_else(|| ComplianceError::UnknownVenue {
                venue: venue.clone(),
            })?;
        let time_zone = name
            .parse::<Tz>()
            .map_err(|_| ComplianceError::NoTimeZone {
                venue: venue.clone(),
            })?;
        self.time_zones.insert(venue.clone(), time_zone);
        Ok(time_zone)
    }

    fn in_window(&self, order: &Order) -> Result<bool, ComplianceError> {
        let time_zone = self.time_zone(order.fields().security.venue())?;
        let time = self.time_client.now().time_of_day_in(time_zone);
        Ok(self.window.contains(time))
    }
}

impl ComplianceRule for TimeFilterComplianceRule {
    fn submit(&self, order: &Order) -> Result<(), ComplianceError> {
        if self.in_window(order)? {
            self.inner.submit(order)
        } else {
            debug!(order_id = %order.id(), "Order outside time window");
            self.add(order)
        }
    }

    fn cancel(&self, order: &Order) -> Result<(), ComplianceError> {
        if self.in_window(order)? {
            self.inner.cancel(order)
        } else {
            Ok(())
        }
    }

    fn add(&self, order: &Order) -> Result<(), ComplianceError> {
        self.inner.add(order)
    }
}

impl std::fmt::Debug for TimeFilterComplianceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeFilterComplianceRule")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}
