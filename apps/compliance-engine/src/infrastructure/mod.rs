//! Infrastructure Layer
//!
//! Adapters implementing the collaborator ports consumed by the compliance
//! rules:
//!
//! - `time`: system and fixed clocks
//! - `definitions`: in-memory venue database
//! - `market_data`: in-memory and unavailable BBO sources
//! - `config`: dependency injection container

pub mod config;
mod definitions;
mod market_data;
mod time;

pub use config::Container;
pub use definitions::InMemoryDefinitionsClient;
pub use market_data::{InMemoryMarketDataClient, UnavailableMarketDataClient};
pub use time::{FixedTimeClient, SystemTimeClient};
