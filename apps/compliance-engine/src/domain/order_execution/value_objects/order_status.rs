//! Order status in the lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status carried by execution reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order submitted, awaiting venue acknowledgment.
    PendingNew,
    /// Order acknowledged by the venue.
    New,
    /// Order partially filled.
    PartiallyFilled,
    /// Order completely filled.
    Filled,
    /// Cancel request submitted, awaiting confirmation.
    PendingCancel,
    /// Cancel request was refused.
    CancelReject,
    /// Order canceled.
    Canceled,
    /// Order rejected.
    Rejected,
    /// Order expired (e.g., Day order at market close).
    Expired,
    /// Order done for the trading day.
    DoneForDay,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Filled | Self::Canceled | Self::Rejected | Self::Expired | Self::DoneForDay
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PendingNew => write!(f, "PENDING_NEW"),
            Self::New => write!(f, "NEW"),
            Self::PartiallyFilled => write!(f, "PARTIALLY_FILLED"),
            Self::Filled => write!(f, "FILLED"),
            Self::PendingCancel => write!(f, "PENDING_CANCEL"),
            Self::CancelReject => write!(f, "CANCEL_REJECT"),
            Self::Canceled => write!(f, "CANCELED"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::DoneForDay => write!(f, "DONE_FOR_DAY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_is_terminal() {
        assert!(!OrderStatus::PendingNew.is_terminal());
        assert!(!OrderStatus::New.is_terminal());
        assert!(!OrderStatus::PartiallyFilled.is_terminal());
        assert!(!OrderStatus::PendingCancel.is_terminal());
        assert!(!OrderStatus::CancelReject.is_terminal());
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::Canceled.is_terminal());
        assert!(OrderStatus::Rejected.is_terminal());
        assert!(OrderStatus::Expired.is_terminal());
        assert!(OrderStatus::DoneForDay.is_terminal());
    }

    #[test]
    fn order_status_serde() {
        let json = serde_json::to_string(&OrderStatus::PartiallyFilled).unwrap();
        assert_eq!(json, "\"PARTIALLY_FILLED\"");
        let parsed: OrderStatus = serde_json::from_str("\"CANCELED\"").unwrap();
        assert_eq!(parsed, OrderStatus::Canceled);
    }
}
