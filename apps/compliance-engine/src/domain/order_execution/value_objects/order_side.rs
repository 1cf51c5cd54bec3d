//! Order side (ask or bid).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the book an order rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    /// Sell order (offers on the ask side).
    Ask,
    /// Buy order (bids on the bid side).
    Bid,
}

impl Side {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Ask => Self::Bid,
            Self::Bid => Self::Ask,
        }
    }

    /// Picks `bid` for [`Side::Bid`] and `ask` for [`Side::Ask`].
    #[must_use]
    pub fn pick<T>(self, bid: T, ask: T) -> T {
        match self {
            Self::Bid => bid,
            Self::Ask => ask,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ask => write!(f, "ASK"),
            Self::Bid => write!(f, "BID"),
        }
    }
}
