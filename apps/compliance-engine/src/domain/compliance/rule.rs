//! The compliance rule contract.

use std::sync::Arc;

use super::ComplianceError;
use crate::domain::order_execution::Order;

/// A policy consulted on every submission and cancellation.
///
/// All methods may be called concurrently for different orders. A rule that
/// rejects a submission must leave its state as if the order had never been
/// presented.
pub trait ComplianceRule: Send + Sync {
    /// Called when `order` is first presented for acceptance.
    ///
    /// The default registers the order through [`ComplianceRule::add`] and
    /// accepts it.
    ///
    /// # Errors
    ///
    /// Returns [`ComplianceError::Check`] if the submission violates the rule,
    /// or any error raised while registering the order.
    fn submit(&self, order: &Order) -> Result<(), ComplianceError> {
        self.add(order)
    }

    /// Called when a cancellation of a previously accepted `order` is
    /// requested. Allowed by default.
    ///
    /// # Errors
    ///
    /// Returns [`ComplianceError::Check`] if the cancellation violates the
    /// rule.
    fn cancel(&self, order: &Order) -> Result<(), ComplianceError> {
        let _ = order;
        Ok(())
    }

    /// Registers an order that was already accepted, without checking it.
    /// Does nothing by default.
    ///
    /// # Errors
    ///
    /// Returns an error if state needed to record the order could not be
    /// built (for instance a multiplexer failing to build a child rule).
    fn add(&self, order: &Order) -> Result<(), ComplianceError> {
        let _ = order;
        Ok(())
    }
}

impl<R: ComplianceRule + ?Sized> ComplianceRule for Box<R> {
    fn submit(&self, order: &Order) -> Result<(), ComplianceError> {
        (**self).submit(order)
    }

    fn cancel(&self, order: &Order) -> Result<(), ComplianceError> {
        (**self).cancel(order)
    }

    fn add(&self, order: &Order) -> Result<(), ComplianceError> {
        (**self).add(order)
    }
}

impl<R: ComplianceRule + ?Sized> ComplianceRule for Arc<R> {
    fn submit(&self, order: &Order) -> Result<(), ComplianceError> {
        (**self).submit(order)
    }

    fn cancel(&self, order: &Order) -> Result<(), ComplianceError> {
        (**self).cancel(order)
    }

    fn add(&self, order: &Order) -> Result<(), ComplianceError> {
        (**self).add(order)
    }
}
