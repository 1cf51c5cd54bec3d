//! Domain Layer
//!
//! The innermost layer containing business logic with no infrastructure
//! dependencies. This layer defines:
//!
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Aggregates**: Orders owning their execution report stream
//! - **Compliance Rules**: Stateful checks composed from schemas
//! - **Client Ports**: Time, reference data and market data abstractions
//!
//! # Bounded Contexts
//!
//! - [`order_execution`]: Orders and execution reports
//! - [`compliance`]: Rule contract, schemas, values and the built-in rules
//! - [`reference_data`]: Venues, regions and scopes

pub mod clients;
pub mod compliance;
pub mod order_execution;
pub mod reference_data;
pub mod shared;
