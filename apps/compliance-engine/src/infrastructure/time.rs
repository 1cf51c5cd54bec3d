//! Time client adapters.

use parking_lot::RwLock;

use crate::domain::clients::TimeClient;
use crate::domain::shared::Timestamp;

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeClient;

impl TimeClient for SystemTimeClient {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
///
/// Used for replaying historical order flow and in tests.
#[derive(Debug)]
pub struct FixedTimeClient {
    time: RwLock<Timestamp>,
}

impl FixedTimeClient {
    /// Create a clock reading `time`.
    #[must_use]
    pub const fn new(time: Timestamp) -> Self {
        Self {
            time: RwLock::new(time),
        }
    }

    /// Set the time.
    pub fn set(&self, time: Timestamp) {
        *self.time.write() = time;
    }

    /// Move the time forward by `delta`.
    pub fn advance(&self, delta: chrono::TimeDelta) {
        let mut time = self.time.write();
        *time = time.saturating_add(delta);
    }
}

impl TimeClient for FixedTimeClient {
    fn now(&self) -> Timestamp {
        *self.time.read()
    }
}
