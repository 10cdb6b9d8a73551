//! `frota-checkout` — checkout domain logic.
//!
//! Everything between "the customer typed an email" and "the provider told
//! us the order is paid": order id generation, provider signing, hosted
//! payment URLs, webhook notifications, and promo-code rules. Pure domain,
//! no HTTP, no storage.

pub mod order;
pub mod payment;
pub mod promo;

pub use order::{Purchase, new_order_id};
pub use payment::{PaymentIntent, PaymentNotification, ProviderConfig, sign};
pub use promo::{PromoCode, PromoEvaluation, normalize_code};
