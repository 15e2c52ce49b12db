//! Domain model for the order-fulfillment backend.
//!
//! This crate provides the pure domain types, no IO:
//! - Order entity with its status state machine
//! - Money, line items, and shipping addresses
//! - Payment records, payment ledger entries, and their status machine

pub mod order;
pub mod payment;

pub use order::{Address, LineItem, Money, Order, OrderError, OrderStatus};
pub use payment::{LedgerEntry, PaymentId, PaymentMethod, PaymentRecord, PaymentStatus};
