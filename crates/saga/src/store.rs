//! Order store trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OrderId;
use domain::Order;

use crate::error::SagaError;

/// Trait for the authoritative order store.
///
/// One row per business order id; upsert-by-id plus lookup-by-id and
/// paginated lookup-by-customer ordered by creation time descending.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts or replaces the order row for its business id.
    async fn upsert(&self, order: &Order) -> Result<(), SagaError>;

    /// Looks up an order by business id.
    async fn find_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, SagaError>;

    /// Returns one page of a customer's orders, newest first.
    async fn find_by_customer(
        &self,
        customer_email: &str,
        page: usize,
        size: usize,
    ) -> Result<Vec<Order>, SagaError>;
}

#[derive(Debug, Default)]
struct InMemoryOrderState {
    orders: HashMap<OrderId, Order>,
    fail_on_upsert: bool,
}

/// In-memory order store for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<InMemoryOrderState>>,
}

impl InMemoryOrderStore {
    /// Creates a new in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail the next upsert calls.
    pub fn set_fail_on_upsert(&self, fail: bool) {
        self.state.write().unwrap().fail_on_upsert = fail;
    }

    /// Returns the number of stored orders.
    pub fn order_count(&self) -> usize {
        self.state.read().unwrap().orders.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn upsert(&self, order: &Order) -> Result<(), SagaError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_upsert {
            return Err(SagaError::Store("order store down".to_string()));
        }

        state
            .orders
            .insert(order.order_id().clone(), order.clone());
        Ok(())
    }

    async fn find_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, SagaError> {
        let state = self.state.read().unwrap();
        Ok(state.orders.get(order_id).cloned())
    }

    async fn find_by_customer(
        &self,
        customer_email: &str,
        page: usize,
        size: usize,
    ) -> Result<Vec<Order>, SagaError> {
        let state = self.state.read().unwrap();
        let mut orders: Vec<_> = state
            .orders
            .values()
            .filter(|o| o.is_owned_by(customer_email))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(orders.into_iter().skip(page * size).take(size).collect())
    }
}
