//! Infrastructure Configuration
//!
//! Dependency injection container wiring the application.

mod container;

pub use container::Container;
