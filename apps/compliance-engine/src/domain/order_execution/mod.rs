//! Order Execution Bounded Context
//!
//! The view of an order the compliance engine needs: its submission fields
//! and the execution reports published for it.
//!
//! # Key Concepts
//!
//! - **Order Aggregate**: immutable fields plus a replaying report stream
//! - **Report Inbox**: per-rule tagged queue the report streams feed into

pub mod aggregate;
pub mod report_inbox;
pub mod value_objects;

pub use aggregate::{Order, OrderFields, OrderInfo, ReportSink};
pub use report_inbox::ReportInbox;
pub use value_objects::{ExecutionReport, OrderStatus, OrderType, Side};
