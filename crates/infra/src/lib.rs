//! `frota-infra` — persistence for purchases, promo codes, and payment
//! intents.
//!
//! In-memory implementations back dev and tests; Postgres implementations
//! (feature `postgres`) back production. The API layer picks one at
//! startup.

pub mod error;
pub mod intents;
pub mod promos;
pub mod purchases;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use error::StoreError;
pub use intents::InMemoryIntentStore;
pub use promos::{InMemoryPromoStore, PromoStore};
pub use purchases::{InMemoryPurchaseStore, PurchaseStore};
#[cfg(feature = "postgres")]
pub use postgres::{PostgresPromoStore, PostgresPurchaseStore};
