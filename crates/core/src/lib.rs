//! `frota-core` — shared domain vocabulary for the Frota storefront.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod email;
pub mod error;
pub mod id;
pub mod money;

pub use email::Email;
pub use error::{DomainError, DomainResult};
pub use id::{IdempotencyKey, OrderId};
pub use money::Money;
