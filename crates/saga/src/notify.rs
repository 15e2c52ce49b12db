//! Best-effort notification bus.
//!
//! The bus is at-least-once and fire-and-forget: publishes are keyed by
//! order id, consumers may re-deliver, and every call site treats a
//! publish failure as loggable-and-droppable. This capability is kept
//! deliberately separate from the primary transactional path.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{OrderId, Sku};
use domain::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A domain notification published to external consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Notification {
    /// Stock was reserved for one line of an order.
    InventoryReserved {
        order_id: OrderId,
        sku: Sku,
        quantity: u32,
    },

    /// Stock was released for one line of an order.
    InventoryReleased {
        order_id: OrderId,
        sku: Sku,
        quantity: u32,
    },

    /// A payment for the order settled successfully.
    PaymentSucceeded { order_id: OrderId, amount: Money },
}

impl Notification {
    /// Returns the topic this notification is published on.
    pub fn topic(&self) -> &'static str {
        match self {
            Notification::InventoryReserved { .. } => "inventory.reserved",
            Notification::InventoryReleased { .. } => "inventory.released",
            Notification::PaymentSucceeded { .. } => "payment.succeeded",
        }
    }

    /// Returns the partition key (the order id).
    pub fn order_id(&self) -> &OrderId {
        match self {
            Notification::InventoryReserved { order_id, .. }
            | Notification::InventoryReleased { order_id, .. }
            | Notification::PaymentSucceeded { order_id, .. } => order_id,
        }
    }
}

/// Errors that can occur when publishing a notification.
///
/// These never propagate to saga callers; they exist so implementations
/// can report failures for logging.
#[derive(Debug, Error)]
pub enum BusError {
    /// The bus is unreachable.
    #[error("Notification bus unavailable: {0}")]
    Unavailable(String),

    /// The payload could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Trait for notification bus implementations.
#[async_trait]
pub trait NotificationBus: Send + Sync {
    /// Publishes a notification keyed by its order id.
    async fn publish(&self, notification: &Notification) -> Result<(), BusError>;
}

/// A message captured by the in-memory bus.
#[derive(Debug, Clone)]
pub struct PublishedMessage {
    pub topic: &'static str,
    pub key: OrderId,
    pub payload: serde_json::Value,
}

#[derive(Debug, Default)]
struct InMemoryBusState {
    messages: Vec<PublishedMessage>,
    fail_on_publish: bool,
}

/// In-memory notification bus for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationBus {
    state: Arc<RwLock<InMemoryBusState>>,
}

impl InMemoryNotificationBus {
    /// Creates a new in-memory bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the bus to fail on publish.
    pub fn set_fail_on_publish(&self, fail: bool) {
        self.state.write().unwrap().fail_on_publish = fail;
    }

    /// Returns all published messages in publish order.
    pub fn published(&self) -> Vec<PublishedMessage> {
        self.state.read().unwrap().messages.clone()
    }

    /// Returns the messages published on a topic, in publish order.
    pub fn published_on(&self, topic: &str) -> Vec<PublishedMessage> {
        self.state
            .read()
            .unwrap()
            .messages
            .iter()
            .filter(|m| m.topic == topic)
            .cloned()
            .collect()
    }

    /// Returns the total number of published messages.
    pub fn message_count(&self) -> usize {
        self.state.read().unwrap().messages.len()
    }
}

#[async_trait]
impl NotificationBus for InMemoryNotificationBus {
    async fn publish(&self, notification: &Notification) -> Result<(), BusError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_publish {
            return Err(BusError::Unavailable("bus down".to_string()));
        }

        let payload = serde_json::to_value(notification)?;
        state.messages.push(PublishedMessage {
            topic: notification.topic(),
            key: notification.order_id().clone(),
            payload,
        });
        Ok(())
    }
}
