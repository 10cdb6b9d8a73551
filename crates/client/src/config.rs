use std::time::Duration;

/// Where the storefront backend lives and how patient the client is.
///
/// Endpoint URLs are injected rather than hardcoded so the same build
/// runs against staging and production backends.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// `POST` target that mints payment intents.
    pub payment_url: String,
    /// `GET` target that resolves an order id into a download link.
    pub download_url: String,
    /// Deadline applied to every request.
    pub request_timeout: Duration,
    /// Pause before the fulfillment view triggers the download on its own.
    pub auto_download_delay: Duration,
}

impl ClientConfig {
    pub fn new(payment_url: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            payment_url: payment_url.into(),
            download_url: download_url.into(),
            request_timeout: Duration::from_secs(10),
            auto_download_delay: Duration::from_secs(1),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_auto_download_delay(mut self, delay: Duration) -> Self {
        self.auto_download_delay = delay;
        self
    }
}
