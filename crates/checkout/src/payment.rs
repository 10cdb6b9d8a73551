//! Hosted payment provider integration: signing, payment URLs, webhooks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use frota_core::{DomainError, DomainResult, Email, Money, OrderId};

/// Payment provider credentials and endpoints.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub shop_id: String,
    pub secret_key: String,
    /// Base URL of the provider's hosted payment page.
    pub pay_base_url: String,
}

impl ProviderConfig {
    pub fn new(
        shop_id: impl Into<String>,
        secret_key: impl Into<String>,
        pay_base_url: impl Into<String>,
    ) -> Self {
        Self {
            shop_id: shop_id.into(),
            secret_key: secret_key.into(),
            pay_base_url: pay_base_url.into(),
        }
    }
}

/// Signature over `shop_id:amount:secret:order_id`, hex-encoded.
///
/// Covers exactly the fields the provider echoes back in the webhook, so
/// the same function both mints and verifies.
pub fn sign(shop_id: &str, amount_units: &str, secret_key: &str, order_id: &OrderId) -> String {
    let material = format!("{shop_id}:{amount_units}:{secret_key}:{order_id}");
    hex::encode(Sha256::digest(material.as_bytes()))
}

/// A freshly minted payment intent: the order id plus the hosted payment
/// URL the customer is redirected to. Transient; nothing is persisted until
/// the provider's webhook confirms payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub order_id: OrderId,
    pub payment_url: String,
}

impl PaymentIntent {
    /// Build the hosted payment URL for an order.
    ///
    /// Parameter names are the provider's wire contract: `m` shop, `oa`
    /// amount, `c`/`cr` currency, `o` order, `s` signature, `cf` customer
    /// email (echoed back in the webhook).
    pub fn create(
        provider: &ProviderConfig,
        price: &Money,
        email: &Email,
        order_id: OrderId,
    ) -> Self {
        let amount = price.units_string();
        let signature = sign(&provider.shop_id, &amount, &provider.secret_key, &order_id);
        let payment_url = format!(
            "{}?m={}&oa={}&c={}&o={}&s={}&cr={}&cf={}",
            provider.pay_base_url,
            provider.shop_id,
            amount,
            price.currency(),
            order_id,
            signature,
            price.currency(),
            email,
        );
        Self {
            order_id,
            payment_url,
        }
    }
}

/// The provider's payment confirmation, parsed from webhook query
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentNotification {
    pub merchant_id: String,
    pub amount_units: String,
    pub order_id: OrderId,
    pub signature: String,
    pub email: Email,
}

impl PaymentNotification {
    /// Parse a notification from webhook query parameters.
    ///
    /// The provider sends either long names (`merchant_id`, `amount`,
    /// `merchant_order_id`, `sign`, `custom_field`) or their short redirect
    /// aliases (`m`, `oa`, `o`, `s`, `cf`).
    pub fn from_query(params: &HashMap<String, String>) -> DomainResult<Self> {
        let take = |long: &str, short: &str| -> DomainResult<&str> {
            params
                .get(long)
                .or_else(|| params.get(short))
                .map(String::as_str)
                .ok_or_else(|| {
                    DomainError::validation(format!("webhook is missing `{long}`/`{short}`"))
                })
        };

        Ok(Self {
            merchant_id: take("merchant_id", "m")?.to_owned(),
            amount_units: take("amount", "oa")?.to_owned(),
            order_id: take("merchant_order_id", "o")?.parse()?,
            signature: take("sign", "s")?.to_owned(),
            email: take("custom_field", "cf")?.parse()?,
        })
    }

    /// Recompute the signature with our secret and compare.
    pub fn verify(&self, secret_key: &str) -> bool {
        let expected = sign(&self.merchant_id, &self.amount_units, secret_key, &self.order_id);
        // Hex digests are fixed-length; plain comparison is fine here.
        expected == self.signature
    }
}
