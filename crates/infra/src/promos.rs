//! Promo code lookup.

use std::collections::HashMap;
use std::sync::RwLock;

use frota_checkout::PromoCode;

use crate::error::StoreError;

/// Read access to configured promo codes, keyed by normalized code.
#[async_trait::async_trait]
pub trait PromoStore: Send + Sync {
    async fn find(&self, code: &str) -> Result<Option<PromoCode>, StoreError>;
}

/// In-memory promo store for tests/dev, seeded by hand.
#[derive(Debug, Default)]
pub struct InMemoryPromoStore {
    inner: RwLock<HashMap<String, PromoCode>>,
}

impl InMemoryPromoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a code (test/dev helper). The key is the code itself, which is
    /// expected to already be in normalized form.
    pub fn insert(&self, promo: PromoCode) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(promo.code.clone(), promo);
        }
    }
}

#[async_trait::async_trait]
impl PromoStore for InMemoryPromoStore {
    async fn find(&self, code: &str) -> Result<Option<PromoCode>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::Unavailable("promo store lock poisoned".into()))?;
        Ok(map.get(code).cloned())
    }
}
