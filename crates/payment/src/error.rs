//! Payment error types.

use common::OrderId;
use domain::{OrderError, PaymentStatus};
use saga::SagaError;
use thiserror::Error;

/// Errors that can occur during payment operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// No payment record exists for the order.
    #[error("No payment found for order {0}")]
    NotFound(OrderId),

    /// The latest payment record is not in the status the operation
    /// requires.
    #[error("Payment for order {order_id} is {actual}, expected {expected}")]
    InvalidState {
        order_id: OrderId,
        actual: PaymentStatus,
        expected: PaymentStatus,
    },

    /// Payment store error.
    #[error("Payment store error: {0}")]
    Store(String),

    /// Ledger store error.
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// An error from the order saga.
    #[error(transparent)]
    Saga(#[from] SagaError),

    /// Status transition rejected by the order state machine.
    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Convenience type alias for payment results.
pub type Result<T> = std::result::Result<T, PaymentError>;
