//! Storefront client flows.
//!
//! The state machines a storefront UI drives: the purchase dialog
//! ([`PurchaseFlow`]), the post-payment fulfillment view
//! ([`FulfillmentFlow`]) and the decorative view counter
//! ([`ViewTicker`]). Transport is behind the [`PaymentApi`] and
//! [`DownloadApi`] traits; [`HttpCheckoutApi`] is the production
//! implementation.

pub mod config;
pub mod error;
pub mod fulfillment;
pub mod http;
pub mod purchase;
pub mod ticker;

pub use config::ClientConfig;
pub use error::FlowError;
pub use fulfillment::{DownloadSink, FulfillmentFlow, FulfillmentState, order_id_from_query};
pub use http::{DownloadApi, DownloadResponse, HttpCheckoutApi, PaymentApi, PaymentResponse};
pub use purchase::PurchaseFlow;
pub use ticker::ViewTicker;
