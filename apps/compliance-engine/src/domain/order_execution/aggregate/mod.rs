//! Order Aggregate
//!
//! The Order aggregate carries the order's immutable submission fields and
//! its execution report stream.

mod order;

pub use order::{Order, OrderFields, OrderInfo, ReportSink};
