use thiserror::Error;

/// Everything that can go wrong while driving the storefront flows.
///
/// `Timeout` is kept apart from `Network`: a deadline we imposed is
/// actionable (retry), a broken transport usually is not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("validation failed: {0}")]
    Validation(String),

    /// A submission for this dialog session is already in flight.
    #[error("a purchase is already being processed")]
    AlreadyProcessing,

    /// The server refused to mint a payment intent.
    #[error("payment failed: {0}")]
    Payment(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("the request timed out")]
    Timeout,

    /// The return URL carried no order id; no request is worth making.
    #[error("order id missing from the return URL")]
    MissingOrder,

    /// The download link could not be obtained or is absent.
    #[error("download unavailable: {0}")]
    DownloadLink(String),
}
