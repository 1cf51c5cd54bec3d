// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Compliance Engine - Rust Core Library
//!
//! Policy layer sitting between order submission/cancellation and the
//! execution driver of the Cream trading system.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic
//!   - `order_execution`: Order aggregate, execution reports, report inboxes
//!   - `compliance`: Rule contract, schemas, values, built-in rules
//!   - `reference_data`: Venue database, `Region` and `Scope` algebra
//!   - `clients`: Time, definitions and market data ports
//!
//! - **Application**: Orchestration
//!   - `registry`: Schema name → rule constructor table and rule builder
//!   - `services`: Per-account `ComplianceRuleSet`
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - In-memory and system clients for every port
//!   - `config`: Dependency injection container

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Rule compilation and the rule set.
pub mod application;

/// Infrastructure layer - Adapters for the client ports.
pub mod infrastructure;

// =============================================================================
// Cross-cutting Concerns
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Coded errors for logs and callers.
pub mod error;

/// Compliance metrics.
pub mod observability;

/// Logging setup.
pub mod telemetry;

// =============================================================================
// Re-exports from Clean Architecture
// =============================================================================

// Domain re-exports
pub use domain::clients::{BboQuote, DefinitionsClient, MarketDataClient, TimeClient};
pub use domain::compliance::{
    ComplianceError, ComplianceFailure, ComplianceParameter, ComplianceRule, ComplianceRuleEntry,
    ComplianceRuleEntryState, ComplianceRuleSchema, ComplianceRuleViolationRecord,
    ComplianceValue, SchemaError,
};
pub use domain::order_execution::{ExecutionReport, Order, OrderFields, OrderInfo, OrderStatus};
pub use domain::reference_data::{Region, Scope, VenueDatabase, VenueEntry};
pub use domain::shared::{AccountId, Money, OrderId, Quantity, Security, Timestamp};

// Application re-exports
pub use application::{ComplianceRuleBuilder, ComplianceRuleRegistry, ComplianceRuleSet};

// Infrastructure re-exports
pub use infrastructure::Container;
pub use infrastructure::{
    FixedTimeClient, InMemoryDefinitionsClient, InMemoryMarketDataClient, SystemTimeClient,
    UnavailableMarketDataClient,
};
