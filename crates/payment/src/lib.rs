//! Payment processing for the order-fulfillment backend.
//!
//! Captures and refunds payments, appends immutable financial ledger
//! entries and drives the order saga's status transitions. Capture can be
//! synchronous (card) or complete later through `update_payment` or an
//! asynchronous `payment.succeeded` bus delivery; the saga's idempotent
//! `mark_paid` makes the duplicate path harmless.

pub mod consumer;
pub mod error;
pub mod processor;
pub mod store;

pub use consumer::PaymentEventConsumer;
pub use error::PaymentError;
pub use processor::PaymentProcessor;
pub use store::{InMemoryLedgerStore, InMemoryPaymentStore, LedgerStore, PaymentStore};
