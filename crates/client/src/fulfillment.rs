//! The post-payment fulfillment view.
//!
//! The provider sends the buyer back with `?order_id=...`; the view
//! resolves that into a download link, auto-triggers the download once
//! after a short pause, and lets the buyer trigger it again without
//! another lookup.

use std::sync::Arc;
use std::time::Duration;

use crate::error::FlowError;
use crate::http::DownloadApi;

/// Pull the order id out of a return-URL query string. Accepts the raw
/// query with or without its leading `?`.
pub fn order_id_from_query(query: &str) -> Option<&str> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name == "order_id" && !value.is_empty()).then_some(value)
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FulfillmentState {
    /// The lookup has not finished yet.
    Loading,
    /// The artifact is ready; `download_again` will re-trigger it.
    Ready { download_url: String },
    Failed(FlowError),
}

/// Where a triggered download goes. In a browser shell this navigates a
/// hidden anchor; tests count calls.
pub trait DownloadSink: Send + Sync {
    fn trigger(&self, download_url: &str);
}

pub struct FulfillmentFlow<A, S> {
    api: A,
    sink: Arc<S>,
    auto_delay: Duration,
    state: FulfillmentState,
    auto_task: Option<tokio::task::JoinHandle<()>>,
}

impl<A: DownloadApi, S: DownloadSink + 'static> FulfillmentFlow<A, S> {
    pub fn new(api: A, sink: S, auto_delay: Duration) -> Self {
        Self {
            api,
            sink: Arc::new(sink),
            auto_delay,
            state: FulfillmentState::Loading,
            auto_task: None,
        }
    }

    pub fn state(&self) -> &FulfillmentState {
        &self.state
    }

    /// Enter the view with the return-URL query string. Resolves the
    /// state exactly once; calling again returns the settled state
    /// without another lookup.
    ///
    /// A missing order id fails locally, before any request.
    pub async fn start(&mut self, query: &str) -> &FulfillmentState {
        if self.state != FulfillmentState::Loading {
            return &self.state;
        }

        let Some(order_id) = order_id_from_query(query) else {
            self.state = FulfillmentState::Failed(FlowError::MissingOrder);
            return &self.state;
        };

        self.state = match self.api.fetch_download(order_id).await {
            Ok(response) => match response.download_url {
                Some(url) => {
                    self.schedule_auto_download(&url);
                    FulfillmentState::Ready { download_url: url }
                }
                None => FulfillmentState::Failed(FlowError::DownloadLink(
                    "response carried no download URL".to_string(),
                )),
            },
            Err(e) => FulfillmentState::Failed(e),
        };
        &self.state
    }

    /// Re-trigger the download from the settled state. No network; the
    /// link from the one lookup is reused.
    pub fn download_again(&self) -> Result<(), FlowError> {
        match &self.state {
            FulfillmentState::Ready { download_url } => {
                self.sink.trigger(download_url);
                Ok(())
            }
            _ => Err(FlowError::DownloadLink(
                "no download link available".to_string(),
            )),
        }
    }

    /// Exactly one automatic trigger per view entry, after the configured
    /// pause. Tearing the view down (dropping the flow) cancels it.
    fn schedule_auto_download(&mut self, download_url: &str) {
        let sink = self.sink.clone();
        let delay = self.auto_delay;
        let url = download_url.to_string();
        self.auto_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(%url, "auto-triggering download");
            sink.trigger(&url);
        }));
    }
}

impl<A, S> Drop for FulfillmentFlow<A, S> {
    fn drop(&mut self) {
        if let Some(task) = &self.auto_task {
            task.abort();
        }
    }
}
