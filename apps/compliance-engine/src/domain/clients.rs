//! Collaborator Ports (Driven Ports)
//!
//! Interfaces the compliance rules consume from the rest of the platform.
//! Implementations live in `infrastructure`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::reference_data::VenueDatabase;
use crate::domain::shared::{Money, Security, Timestamp};

/// Source of the current time.
#[cfg_attr(test, mockall::automock)]
pub trait TimeClient: Send + Sync {
    /// The current time.
    fn now(&self) -> Timestamp;
}

/// Reference data lookups.
#[cfg_attr(test, mockall::automock)]
pub trait DefinitionsClient: Send + Sync {
    /// The venue database (venue → country, time zone).
    fn load_venue_database(&self) -> Arc<VenueDatabase>;
}

/// Best bid and offer for a security.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BboQuote {
    /// Best bid price.
    pub bid: Money,
    /// Best ask price.
    pub ask: Money,
    /// Quote timestamp.
    pub timestamp: Timestamp,
}

impl BboQuote {
    /// Create a new quote.
    #[must_use]
    pub const fn new(bid: Money, ask: Money, timestamp: Timestamp) -> Self {
        Self {
            bid,
            ask,
            timestamp,
        }
    }
}

/// Market data lookups.
#[cfg_attr(test, mockall::automock)]
pub trait MarketDataClient: Send + Sync {
    /// The latest BBO quote for `security`, if one has been published.
    fn load_bbo_quote(&self, security: &Security) -> Option<BboQuote>;
}
