//! Order type (market, limit, etc.).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order type specifying execution behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Market order - execute at best available price.
    Market,
    /// Limit order - execute at specified price or better.
    Limit,
    /// Pegged order - price tracks a reference price.
    Pegged,
    /// Stop order - becomes market order when stop price is reached.
    Stop,
}

impl OrderType {
    /// Returns true for the order types that carry an executable price
    /// (limit and market orders).
    #[must_use]
    pub const fn is_priced(&self) -> bool {
        matches!(self, Self::Limit | Self::Market)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Market => write!(f, "MARKET"),
            Self::Limit => write!(f, "LIMIT"),
            Self::Pegged => write!(f, "PEGGED"),
            Self::Stop => write!(f, "STOP"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_type_is_priced() {
        assert!(OrderType::Limit.is_priced());
        assert!(OrderType::Market.is_priced());
        assert!(!OrderType::Pegged.is_priced());
        assert!(!OrderType::Stop.is_priced());
    }

    #[test]
    fn order_type_display() {
        assert_eq!(format!("{}", OrderType::Limit), "LIMIT");
        assert_eq!(format!("{}", OrderType::Pegged), "PEGGED");
    }
}
