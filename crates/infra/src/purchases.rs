//! Purchase records: written by the payment webhook, read by the download
//! endpoint.

use std::collections::HashMap;
use std::sync::RwLock;

use frota_checkout::Purchase;
use frota_core::OrderId;

use crate::error::StoreError;

/// Storage for confirmed purchases.
#[async_trait::async_trait]
pub trait PurchaseStore: Send + Sync {
    /// Record a purchase. Idempotent on order id: returns `true` when the
    /// record was inserted, `false` when the order was already recorded
    /// (duplicate webhook delivery).
    async fn record(&self, purchase: Purchase) -> Result<bool, StoreError>;

    /// Look a purchase up by order id.
    async fn find(&self, order_id: &OrderId) -> Result<Option<Purchase>, StoreError>;
}

/// In-memory purchase store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryPurchaseStore {
    inner: RwLock<HashMap<OrderId, Purchase>>,
}

impl InMemoryPurchaseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PurchaseStore for InMemoryPurchaseStore {
    async fn record(&self, purchase: Purchase) -> Result<bool, StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::Unavailable("purchase store lock poisoned".into()))?;
        if map.contains_key(&purchase.order_id) {
            return Ok(false);
        }
        map.insert(purchase.order_id.clone(), purchase);
        Ok(true)
    }

    async fn find(&self, order_id: &OrderId) -> Result<Option<Purchase>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::Unavailable("purchase store lock poisoned".into()))?;
        Ok(map.get(order_id).cloned())
    }
}
