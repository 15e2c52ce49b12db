use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::Sku;

use crate::{Result, StockError, ledger::StockLedger};

#[derive(Debug, Default)]
struct InMemoryStockState {
    quantities: HashMap<Sku, u32>,
    fail_on_reserve: bool,
}

/// In-memory stock ledger.
///
/// A test double behind the same interface as the store-backed ledger; the
/// check-and-write happens under a single lock guard, which stands in for
/// the store-level conditional update within one process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStockLedger {
    state: Arc<RwLock<InMemoryStockState>>,
}

impl InMemoryStockLedger {
    /// Creates an empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger seeded with the given quantities.
    pub fn with_quantities(quantities: impl IntoIterator<Item = (Sku, u32)>) -> Self {
        let ledger = Self::new();
        ledger.state.write().unwrap().quantities = quantities.into_iter().collect();
        ledger
    }

    /// Configures the ledger to fail the next calls with a store error.
    pub fn set_fail_on_reserve(&self, fail: bool) {
        self.state.write().unwrap().fail_on_reserve = fail;
    }
}

#[async_trait]
impl StockLedger for InMemoryStockLedger {
    async fn reserve(&self, sku: &Sku, qty: u32) -> Result<bool> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_reserve {
            return Err(StockError::Unavailable("stock store down".to_string()));
        }

        let current = state.quantities.get(sku).copied().unwrap_or(0);
        if current >= qty {
            state.quantities.insert(sku.clone(), current - qty);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn release(&self, sku: &Sku, qty: u32) -> Result<bool> {
        let mut state = self.state.write().unwrap();
        match state.quantities.get_mut(sku) {
            Some(current) => {
                *current += qty;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn available(&self, sku: &Sku) -> Result<Option<u32>> {
        let state = self.state.read().unwrap();
        Ok(state.quantities.get(sku).copied())
    }

    async fn set_quantity(&self, sku: &Sku, qty: u32) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.quantities.insert(sku.clone(), qty);
        Ok(())
    }
}
