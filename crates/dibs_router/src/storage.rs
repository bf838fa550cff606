//! In-memory order store for sandbox deployments and tests.
//!
//! Real deployments plug their own `OrderStore` into the app state; this one
//! keeps everything behind a lock in process memory.

use std::{collections::HashMap, sync::RwLock};

use dibs_gateway::{
    errors::{CustomResult, StorageError},
    Order, OrderStore,
};

#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<String, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an order, replacing any existing one with the same id.
    pub fn insert(&self, order: Order) -> CustomResult<(), StorageError> {
        let mut orders = self.orders.write().map_err(|_| StorageError::Unavailable)?;
        orders.insert(order.id.clone(), order);
        Ok(())
    }
}

#[async_trait::async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn find_by_id(&self, order_id: &str) -> CustomResult<Option<Order>, StorageError> {
        let orders = self.orders.read().map_err(|_| StorageError::Unavailable)?;
        Ok(orders.get(order_id).cloned())
    }

    async fn save(&self, order: &Order) -> CustomResult<(), StorageError> {
        let mut orders = self.orders.write().map_err(|_| StorageError::WriteFailed)?;
        orders.insert(order.id.clone(), order.clone());
        Ok(())
    }
}
