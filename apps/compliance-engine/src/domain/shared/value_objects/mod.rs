//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.
//! Value objects are compared by value, not identity.

mod identifiers;
mod money;
mod quantity;
mod security;
mod timestamp;

pub use identifiers::{AccountId, CountryCode, CurrencyId, OrderId, VenueCode};
pub use money::Money;
pub use quantity::Quantity;
pub use security::{Security, Ticker, WILDCARD};
pub use timestamp::Timestamp;
