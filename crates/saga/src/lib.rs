//! Order lifecycle saga.
//!
//! This crate coordinates order creation, cancellation, payment and
//! address changes against the stock ledger, the order store, the event
//! timeline and an external notification bus. It contains all the
//! compensation logic: stock is reserved line by line, and on the first
//! failure every already-reserved line is released again in the same
//! order.
//!
//! There is no shared transaction coordinator. The primary path (stock
//! mutation, order persistence) must succeed; the side channels (event
//! timeline, reservation records, bus notifications) are best-effort and
//! never roll back a committed transition.

pub mod config;
pub mod error;
pub mod notify;
pub mod service;
pub mod store;

pub use config::SagaConfig;
pub use error::SagaError;
pub use notify::{BusError, InMemoryNotificationBus, Notification, NotificationBus, PublishedMessage};
pub use service::OrderSaga;
pub use store::{InMemoryOrderStore, OrderStore};
