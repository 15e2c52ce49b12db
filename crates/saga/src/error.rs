//! Saga error types.

use common::{OrderId, Sku};
use domain::{OrderError, OrderStatus};
use stock::StockError;
use thiserror::Error;
use timeline::TimelineError;

/// Errors that can occur during saga operations.
#[derive(Debug, Error)]
pub enum SagaError {
    /// A line item could not be reserved. `available` is a best-effort
    /// lookup and is `None` when the quantity could not be determined.
    #[error("Insufficient stock for {sku}: requested {requested}")]
    InsufficientStock {
        sku: Sku,
        requested: u32,
        available: Option<u32>,
    },

    /// No order exists with the given business id.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order is not in a status the operation accepts.
    #[error("Order {order_id} is in state {actual}, expected {expected}")]
    InvalidOrderState {
        order_id: OrderId,
        actual: OrderStatus,
        expected: &'static str,
    },

    /// The requester does not own the resource.
    #[error("User {requester} is not authorized to access {resource}")]
    Unauthorized { requester: String, resource: String },

    /// Order store error.
    #[error("Order store error: {0}")]
    Store(String),

    /// Stock ledger error.
    #[error("Stock ledger error: {0}")]
    Stock(#[from] StockError),

    /// Timeline store error (read path only; timeline writes are
    /// best-effort and never surface here).
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Status transition rejected by the order state machine.
    #[error(transparent)]
    Transition(#[from] OrderError),
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
