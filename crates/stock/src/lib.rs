//! Stock ledger for the order-fulfillment backend.
//!
//! The ledger owns per-SKU available quantity and exposes an atomic
//! conditional decrement (`reserve`) and an unconditional increment
//! (`release`). Correctness under concurrent callers across process
//! instances rests entirely on the backing store's conditional update;
//! there is no application-level locking.

pub mod error;
pub mod ledger;
pub mod memory;
pub mod postgres;

pub use error::{Result, StockError};
pub use ledger::StockLedger;
pub use memory::InMemoryStockLedger;
pub use postgres::PostgresStockLedger;
