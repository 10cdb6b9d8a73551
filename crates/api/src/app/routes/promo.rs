//! Promo code validation.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use frota_checkout::normalize_code;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/check", post(check_promo))
}

/// `POST /promo/check` — validate a code and report the discount.
pub async fn check_promo(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CheckPromoRequest>,
) -> axum::response::Response {
    let code = normalize_code(&body.promo_code);
    if code.is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "promo code required");
    }

    let promo = match services.promos.find(&code).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "promo code not found");
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    let eval = match promo.evaluate() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "valid": true,
            "discount_percent": eval.discount_percent,
            "discount_amount": eval.discount_amount,
            "remaining_uses": eval.remaining_uses,
        })),
    )
        .into_response()
}
