//! Order Execution Value Objects

mod execution_report;
mod order_side;
mod order_status;
mod order_type;

pub use execution_report::ExecutionReport;
pub use order_side::Side;
pub use order_status::OrderStatus;
pub use order_type::OrderType;
