//! Postgres-backed stores.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE purchases (
//!     order_id     TEXT PRIMARY KEY,
//!     email        TEXT NOT NULL,
//!     amount_minor BIGINT NOT NULL,
//!     currency     TEXT NOT NULL,
//!     created_at   TIMESTAMPTZ NOT NULL
//! );
//!
//! CREATE TABLE promo_codes (
//!     code             TEXT PRIMARY KEY,
//!     discount_percent INTEGER NOT NULL DEFAULT 0,
//!     discount_amount  BIGINT NOT NULL DEFAULT 0,
//!     max_uses         INTEGER NOT NULL,
//!     current_uses     INTEGER NOT NULL DEFAULT 0,
//!     is_active        BOOLEAN NOT NULL DEFAULT TRUE
//! );
//! ```

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use frota_checkout::{PromoCode, Purchase};
use frota_core::{Email, Money, OrderId};

use crate::error::StoreError;
use crate::promos::PromoStore;
use crate::purchases::PurchaseStore;

fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

/// Postgres purchase store. The pool is cheap to clone and thread-safe.
#[derive(Debug, Clone)]
pub struct PostgresPurchaseStore {
    pool: PgPool,
}

impl PostgresPurchaseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PurchaseStore for PostgresPurchaseStore {
    async fn record(&self, purchase: Purchase) -> Result<bool, StoreError> {
        let amount_minor = i64::try_from(purchase.amount.amount_minor())
            .map_err(|_| StoreError::Corrupt("amount exceeds BIGINT".into()))?;

        let result = sqlx::query(
            r#"
            INSERT INTO purchases (order_id, email, amount_minor, currency, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (order_id) DO NOTHING
            "#,
        )
        .bind(purchase.order_id.as_str())
        .bind(purchase.email.as_str())
        .bind(amount_minor)
        .bind(purchase.amount.currency())
        .bind(purchase.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() == 1)
    }

    async fn find(&self, order_id: &OrderId) -> Result<Option<Purchase>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT email, amount_minor, currency, created_at
            FROM purchases
            WHERE order_id = $1
            "#,
        )
        .bind(order_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let email: String = row.try_get("email").map_err(db_err)?;
        let amount_minor: i64 = row.try_get("amount_minor").map_err(db_err)?;
        let currency: String = row.try_get("currency").map_err(db_err)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(db_err)?;

        let email = Email::parse(&email).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let amount_minor = u64::try_from(amount_minor)
            .map_err(|_| StoreError::Corrupt("negative amount".into()))?;
        let amount =
            Money::new(amount_minor, currency).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        Ok(Some(Purchase {
            order_id: order_id.clone(),
            email,
            amount,
            created_at,
        }))
    }
}

/// Postgres promo store.
#[derive(Debug, Clone)]
pub struct PostgresPromoStore {
    pool: PgPool,
}

impl PostgresPromoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PromoStore for PostgresPromoStore {
    async fn find(&self, code: &str) -> Result<Option<PromoCode>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT code, discount_percent, discount_amount, max_uses, current_uses, is_active
            FROM promo_codes
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let discount_percent: i32 = row.try_get("discount_percent").map_err(db_err)?;
        let discount_amount: i64 = row.try_get("discount_amount").map_err(db_err)?;
        let max_uses: i32 = row.try_get("max_uses").map_err(db_err)?;
        let current_uses: i32 = row.try_get("current_uses").map_err(db_err)?;

        Ok(Some(PromoCode {
            code: row.try_get("code").map_err(db_err)?,
            discount_percent: u32::try_from(discount_percent)
                .map_err(|_| StoreError::Corrupt("negative discount_percent".into()))?,
            discount_amount: u64::try_from(discount_amount)
                .map_err(|_| StoreError::Corrupt("negative discount_amount".into()))?,
            max_uses: u32::try_from(max_uses)
                .map_err(|_| StoreError::Corrupt("negative max_uses".into()))?,
            current_uses: u32::try_from(current_uses)
                .map_err(|_| StoreError::Corrupt("negative current_uses".into()))?,
            is_active: row.try_get("is_active").map_err(db_err)?,
        }))
    }
}
