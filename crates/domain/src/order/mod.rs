//! Order entity and related types.

mod entity;
mod status;
mod value_objects;

pub use entity::Order;
pub use status::OrderStatus;
pub use value_objects::{Address, LineItem, Money};

use common::OrderId;
use thiserror::Error;

/// Errors that can occur when mutating an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The requested status transition is not in the transition table.
    #[error("cannot transition order {order_id} from {from} to {to}")]
    InvalidTransition {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },
}
