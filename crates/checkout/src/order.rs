//! Orders and recorded purchases.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use frota_core::{Email, Money, OrderId};

/// Mint a fresh order id for a payment intent: `frot_<unix-ts>_<suffix>`.
///
/// The suffix is derived from the customer email, keeping ids short enough
/// for provider query strings while making collisions within one second
/// unlikely for distinct customers.
pub fn new_order_id(email: &Email, at: DateTime<Utc>) -> OrderId {
    let digest = Sha256::digest(email.as_str().as_bytes());
    let suffix = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) % 100_000;
    let raw = format!("frot_{}_{}", at.timestamp(), suffix);
    // Infallible by construction: prefix, charset and length all hold.
    OrderId::new(raw).expect("generated order id is always valid")
}

/// A confirmed purchase, recorded when the provider webhook fires and read
/// back by the download endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub order_id: OrderId,
    pub email: Email,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
}
