//! Timestamp value object for temporal data.

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp for execution reports and time client readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The earliest representable timestamp ("never").
    pub const MIN: Self = Self(DateTime::<Utc>::MIN_UTC);

    /// Create a new Timestamp from a DateTime<Utc>.
    #[must_use]
    pub const fn new(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get the current timestamp.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse from an ISO 8601 string.
    ///
    /// # Errors
    ///
    /// Returns error if the string is not a valid ISO 8601 timestamp.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        let dt = DateTime::parse_from_rfc3339(s)?;
        Ok(Self(dt.with_timezone(&Utc)))
    }

    /// Get the inner DateTime<Utc>.
    #[must_use]
    pub const fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Format as ISO 8601 / RFC 3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Calculate duration since another timestamp.
    #[must_use]
    pub fn duration_since(&self, other: Self) -> TimeDelta {
        self.0.signed_duration_since(other.0)
    }

    /// Returns this timestamp shifted by `delta`, saturating at the bounds.
    #[must_use]
    pub fn saturating_sub(&self, delta: TimeDelta) -> Self {
        self.0
            .checked_sub_signed(delta)
            .map_or(Self::MIN, Self)
    }

    /// Returns this timestamp advanced by `delta`.
    #[must_use]
    pub fn saturating_add(&self, delta: TimeDelta) -> Self {
        self.0
            .checked_add_signed(delta)
            .map_or(Self(DateTime::<Utc>::MAX_UTC), Self)
    }

    /// Wall-clock time of day of this timestamp in the given time zone.
    #[must_use]
    pub fn time_of_day_in(&self, tz: Tz) -> NaiveTime {
        self.0.with_timezone(&tz).time()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}
