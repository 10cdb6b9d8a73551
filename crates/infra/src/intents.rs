//! Idempotency-key replay cache for payment intents.
//!
//! Intents are transient: they only need to survive long enough to absorb a
//! double-click or a retry after a transient failure, so this cache is
//! in-memory even when purchases are in Postgres. A lost entry costs one
//! extra (unpaid) order id, never a duplicate charge.

use std::collections::HashMap;
use std::sync::RwLock;

use frota_checkout::PaymentIntent;
use frota_core::IdempotencyKey;

use crate::error::StoreError;

/// In-memory `IdempotencyKey -> PaymentIntent` cache.
#[derive(Debug, Default)]
pub struct InMemoryIntentStore {
    inner: RwLock<HashMap<IdempotencyKey, PaymentIntent>>,
}

impl InMemoryIntentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the intent previously stored under `key`, if any.
    pub fn get(&self, key: &IdempotencyKey) -> Result<Option<PaymentIntent>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::Unavailable("intent store lock poisoned".into()))?;
        Ok(map.get(key).cloned())
    }

    /// Remember an intent under the client's idempotency key.
    pub fn put(&self, key: IdempotencyKey, intent: PaymentIntent) -> Result<(), StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::Unavailable("intent store lock poisoned".into()))?;
        map.insert(key, intent);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frota_core::OrderId;

    #[test]
    fn replayed_key_returns_the_stored_intent() {
        let store = InMemoryIntentStore::new();
        let key = IdempotencyKey::new();
        let intent = PaymentIntent {
            order_id: OrderId::new("frot_1_1").unwrap(),
            payment_url: "https://pay.example/pay?o=frot_1_1".to_owned(),
        };

        assert!(store.get(&key).unwrap().is_none());
        store.put(key, intent.clone()).unwrap();
        assert_eq!(store.get(&key).unwrap(), Some(intent));
    }
}
