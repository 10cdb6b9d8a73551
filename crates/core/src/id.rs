//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Prefix carried by every order identifier.
pub const ORDER_ID_PREFIX: &str = "frot_";

const ORDER_ID_MAX_LEN: usize = 64;

/// Identifier of a payment order.
///
/// Textual id of the form `frot_<unix-ts>_<suffix>`. The id travels through
/// provider redirects and webhook query strings, so the character set is
/// restricted to ASCII alphanumerics and underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderId(String);

impl OrderId {
    /// Validate and wrap a raw order id.
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        if !raw.starts_with(ORDER_ID_PREFIX) {
            return Err(DomainError::invalid_id(format!(
                "OrderId: missing `{ORDER_ID_PREFIX}` prefix"
            )));
        }
        if raw.len() > ORDER_ID_MAX_LEN {
            return Err(DomainError::invalid_id("OrderId: too long"));
        }
        if !raw.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return Err(DomainError::invalid_id(
                "OrderId: only ASCII alphanumerics and underscores allowed",
            ));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OrderId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for OrderId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrderId> for String {
    fn from(value: OrderId) -> Self {
        value.0
    }
}

/// Client-minted idempotency token for payment submissions.
///
/// One key per purchase-dialog session; replaying the key must not create a
/// second payment intent.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(Uuid);

impl IdempotencyKey {
    /// Create a new key.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing keys explicitly in tests
    /// for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for IdempotencyKey {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for IdempotencyKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s)
            .map_err(|e| DomainError::invalid_id(format!("IdempotencyKey: {e}")))?;
        Ok(Self(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_requires_prefix() {
        assert!(OrderId::new("frot_1700000000_42").is_ok());
        assert!(matches!(
            OrderId::new("ord_1700000000_42"),
            Err(DomainError::InvalidId(_))
        ));
    }

    #[test]
    fn order_id_rejects_hostile_characters() {
        assert!(OrderId::new("frot_1;DROP TABLE purchases").is_err());
        assert!(OrderId::new("frot_abc%20def").is_err());
    }

    #[test]
    fn order_id_round_trips_through_display() {
        let id = OrderId::new("frot_1700000000_42").unwrap();
        let again: OrderId = id.to_string().parse().unwrap();
        assert_eq!(id, again);
    }

    #[test]
    fn idempotency_key_parses_its_own_display() {
        let key = IdempotencyKey::new();
        let parsed: IdempotencyKey = key.to_string().parse().unwrap();
        assert_eq!(key, parsed);
    }
}
