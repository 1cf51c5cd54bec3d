//! Shared Domain Types
//!
//! Value objects shared across the order and compliance contexts.

pub mod value_objects;

pub use value_objects::{
    AccountId, CountryCode, CurrencyId, Money, OrderId, Quantity, Security, Ticker, Timestamp,
    VenueCode,
};
