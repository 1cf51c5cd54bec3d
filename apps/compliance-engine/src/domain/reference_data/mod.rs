//! Reference Data
//!
//! Location algebra used to scope compliance rules: [`Region`] and
//! [`Scope`] containment sets, and the [`VenueDatabase`] that resolves a
//! venue to its country and time zone.

mod region;
mod scope;
mod venue_database;

pub use region::Region;
pub use scope::Scope;
pub use venue_database::{VenueDatabase, VenueEntry};
