//! Payment record store and immutable ledger store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OrderId;
use domain::{LedgerEntry, PaymentRecord};

use crate::error::PaymentError;

/// Trait for the payment record store.
///
/// Lookup is "latest by order": capture keeps one logical current record
/// per order, while each refund adds a new record, keeping history
/// append-style.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Inserts or replaces a record by its payment id.
    async fn save(&self, record: &PaymentRecord) -> Result<(), PaymentError>;

    /// Returns the most recently created record for an order.
    async fn find_latest_by_order(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<PaymentRecord>, PaymentError>;

    /// Returns all records for an order, oldest first.
    async fn history_for_order(
        &self,
        order_id: &OrderId,
    ) -> Result<Vec<PaymentRecord>, PaymentError>;
}

/// Trait for the immutable financial ledger.
///
/// Append-only: one row per monetary event, never updated or deleted.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Appends a ledger entry.
    async fn append(&self, entry: &LedgerEntry) -> Result<(), PaymentError>;

    /// Returns all entries for an order, oldest first.
    async fn entries_for_order(&self, order_id: &OrderId)
    -> Result<Vec<LedgerEntry>, PaymentError>;
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    records: HashMap<OrderId, Vec<PaymentRecord>>,
    fail_on_save: bool,
}

/// In-memory payment store for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentStore {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

impl InMemoryPaymentStore {
    /// Creates a new in-memory payment store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail the next save calls.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.state.write().unwrap().fail_on_save = fail;
    }

    /// Returns the number of records stored for an order.
    pub fn record_count(&self, order_id: &OrderId) -> usize {
        self.state
            .read()
            .unwrap()
            .records
            .get(order_id)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn save(&self, record: &PaymentRecord) -> Result<(), PaymentError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_save {
            return Err(PaymentError::Store("payment store down".to_string()));
        }

        let records = state.records.entry(record.order_id.clone()).or_default();
        match records
            .iter_mut()
            .find(|r| r.payment_id == record.payment_id)
        {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }

    async fn find_latest_by_order(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<PaymentRecord>, PaymentError> {
        let state = self.state.read().unwrap();
        Ok(state
            .records
            .get(order_id)
            .and_then(|records| records.last().cloned()))
    }

    async fn history_for_order(
        &self,
        order_id: &OrderId,
    ) -> Result<Vec<PaymentRecord>, PaymentError> {
        let state = self.state.read().unwrap();
        Ok(state.records.get(order_id).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Default)]
struct InMemoryLedgerState {
    entries: Vec<LedgerEntry>,
    fail_on_append: bool,
}

/// In-memory ledger store for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerStore {
    state: Arc<RwLock<InMemoryLedgerState>>,
}

impl InMemoryLedgerStore {
    /// Creates a new in-memory ledger store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail the next append calls.
    pub fn set_fail_on_append(&self, fail: bool) {
        self.state.write().unwrap().fail_on_append = fail;
    }

    /// Returns the total number of ledger entries.
    pub fn entry_count(&self) -> usize {
        self.state.read().unwrap().entries.len()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn append(&self, entry: &LedgerEntry) -> Result<(), PaymentError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_append {
            return Err(PaymentError::Ledger("ledger store down".to_string()));
        }

        state.entries.push(entry.clone());
        Ok(())
    }

    async fn entries_for_order(
        &self,
        order_id: &OrderId,
    ) -> Result<Vec<LedgerEntry>, PaymentError> {
        let state = self.state.read().unwrap();
        Ok(state
            .entries
            .iter()
            .filter(|e| &e.order_id == order_id)
            .cloned()
            .collect())
    }
}
