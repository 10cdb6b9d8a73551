//! HTTP transport behind the flow state machines.
//!
//! The flows only see [`PaymentApi`] and [`DownloadApi`]; tests swap in
//! fakes, production wires [`HttpCheckoutApi`].

use async_trait::async_trait;
use serde::Deserialize;

use frota_core::IdempotencyKey;

use crate::config::ClientConfig;
use crate::error::FlowError;

/// Successful answer from the payment intent endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentResponse {
    pub payment_url: Option<String>,
    pub order_id: Option<String>,
}

/// Successful answer from the download endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadResponse {
    pub download_url: Option<String>,
    pub email: Option<String>,
}

/// Error body the backend uses across endpoints.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl ErrorBody {
    fn into_message(self, fallback: &str) -> String {
        self.message
            .or(self.error)
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[async_trait]
pub trait PaymentApi: Send + Sync {
    /// Ask the backend to mint a payment intent for `email`. The
    /// idempotency key ties retries to one dialog session.
    async fn create_payment(
        &self,
        email: &str,
        key: &IdempotencyKey,
    ) -> Result<PaymentResponse, FlowError>;
}

#[async_trait]
pub trait DownloadApi: Send + Sync {
    /// Resolve a paid order into its download link.
    async fn fetch_download(&self, order_id: &str) -> Result<DownloadResponse, FlowError>;
}

/// [`PaymentApi`] + [`DownloadApi`] over reqwest, with the configured
/// per-request deadline.
#[derive(Debug, Clone)]
pub struct HttpCheckoutApi {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpCheckoutApi {
    pub fn new(config: ClientConfig) -> Result<Self, FlowError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FlowError::Network(e.to_string()))?;
        Ok(Self { http, config })
    }
}

fn transport_error(e: reqwest::Error) -> FlowError {
    if e.is_timeout() {
        FlowError::Timeout
    } else {
        FlowError::Network(e.to_string())
    }
}

#[async_trait]
impl PaymentApi for HttpCheckoutApi {
    async fn create_payment(
        &self,
        email: &str,
        key: &IdempotencyKey,
    ) -> Result<PaymentResponse, FlowError> {
        let res = self
            .http
            .post(&self.config.payment_url)
            .header("Idempotency-Key", key.to_string())
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await
            .map_err(transport_error)?;

        if !res.status().is_success() {
            let msg = match res.json::<ErrorBody>().await {
                Ok(body) => body.into_message("payment could not be created"),
                Err(_) => "payment could not be created".to_string(),
            };
            return Err(FlowError::Payment(msg));
        }

        res.json::<PaymentResponse>()
            .await
            .map_err(|e| FlowError::Payment(format!("malformed payment response: {e}")))
    }
}

#[async_trait]
impl DownloadApi for HttpCheckoutApi {
    async fn fetch_download(&self, order_id: &str) -> Result<DownloadResponse, FlowError> {
        let res = self
            .http
            .get(&self.config.download_url)
            .query(&[("order_id", order_id)])
            .send()
            .await
            .map_err(transport_error)?;

        if !res.status().is_success() {
            let msg = match res.json::<ErrorBody>().await {
                Ok(body) => body.into_message("failed to fetch the download link"),
                Err(_) => "failed to fetch the download link".to_string(),
            };
            return Err(FlowError::DownloadLink(msg));
        }

        res.json::<DownloadResponse>()
            .await
            .map_err(|e| FlowError::DownloadLink(format!("malformed download response: {e}")))
    }
}
