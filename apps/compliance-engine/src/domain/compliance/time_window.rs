//! Time-of-day windows.

use chrono::{NaiveTime, TimeDelta, Timelike};

/// A closed time-of-day interval `[start, end]`.
///
/// When `start > end` the window wraps midnight, so 22:00–02:00 contains
/// 23:00 and 01:00 but not 10:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: TimeDelta,
    end: TimeDelta,
}

impl TimeWindow {
    /// Create a window from offsets since midnight.
    #[must_use]
    pub const fn new(start: TimeDelta, end: TimeDelta) -> Self {
        Self { start, end }
    }

    /// Start of the window.
    #[must_use]
    pub const fn start(&self) -> TimeDelta {
        self.start
    }

    /// End of the window.
    #[must_use]
    pub const fn end(&self) -> TimeDelta {
        self.end
    }

    /// Returns true iff `time` falls within the window.
    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        let time = TimeDelta::seconds(i64::from(time.num_seconds_from_midnight()))
            + TimeDelta::nanoseconds(i64::from(time.nanosecond()));
        if self.start > self.end {
            time >= self.start || time <= self.end
        } else {
            time >= self.start && time <= self.end
        }
    }
}
