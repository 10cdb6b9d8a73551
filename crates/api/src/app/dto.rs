use serde::Deserialize;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckPromoRequest {
    #[serde(default)]
    pub promo_code: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    pub order_id: Option<String>,
}
