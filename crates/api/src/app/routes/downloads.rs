//! Download-link endpoint: order id in, artifact URL out.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use frota_core::OrderId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/", get(get_download))
}

/// `GET /downloads?order_id=...`
pub async fn get_download(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::DownloadParams>,
) -> axum::response::Response {
    let raw = params.order_id.unwrap_or_default();
    if raw.trim().is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "order id required");
    }

    let order_id: OrderId = match raw.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let purchase = match services.purchases.find(&order_id).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "purchase not found");
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    let Some(download_url) = services.config.download_url() else {
        return errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "not_configured",
            "download system not configured",
        );
    };

    tracing::info!(order_id = %order_id, "download link served");
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "download_url": download_url,
            "email": purchase.email,
        })),
    )
        .into_response()
}
