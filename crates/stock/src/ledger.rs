use async_trait::async_trait;
use common::Sku;

use crate::Result;

/// Core trait for stock ledger implementations.
///
/// The ledger is the single source of truth for available quantity. All
/// implementations must be thread-safe (Send + Sync), and `reserve` must be
/// backed by a single store-level conditional update, never a separate
/// read followed by a write.
#[async_trait]
pub trait StockLedger: Send + Sync {
    /// Atomically decrements available quantity for `sku` by `qty`.
    ///
    /// Succeeds iff `available >= qty` at the moment of the conditional
    /// update. On failure the stock row is left untouched and `Ok(false)`
    /// is returned.
    async fn reserve(&self, sku: &Sku, qty: u32) -> Result<bool>;

    /// Unconditionally increments available quantity for `sku` by `qty`.
    ///
    /// Returns `Ok(false)` only when the sku does not exist.
    async fn release(&self, sku: &Sku, qty: u32) -> Result<bool>;

    /// Returns the available quantity, or `None` for an unknown sku.
    async fn available(&self, sku: &Sku) -> Result<Option<u32>>;

    /// Sets the available quantity for `sku`, creating the row if needed.
    ///
    /// Used for seeding and operational corrections, never on the order
    /// path.
    async fn set_quantity(&self, sku: &Sku, qty: u32) -> Result<()>;
}
