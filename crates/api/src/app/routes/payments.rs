//! Payment intent creation and the provider's payment webhook.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use chrono::Utc;

use frota_checkout::{PaymentIntent, PaymentNotification, Purchase, new_order_id};
use frota_core::{Email, IdempotencyKey, Money};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_payment))
        .route("/webhook", post(webhook))
}

/// `POST /payments` — mint a payment intent and hand back the hosted
/// payment URL.
pub async fn create_payment(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::CreatePaymentRequest>,
) -> axum::response::Response {
    let email = match Email::parse(&body.email) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let Some(provider) = &services.config.provider else {
        return errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "not_configured",
            "payment system not configured",
        );
    };

    let idempotency_key = match parse_idempotency_key(&headers) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    // Replay: the same dialog session resubmitting must not mint a second
    // payment intent.
    if let Some(key) = idempotency_key {
        match services.intents.get(&key) {
            Ok(Some(intent)) => {
                tracing::info!(order_id = %intent.order_id, %key, "replaying payment intent");
                return intent_response(&intent);
            }
            Ok(None) => {}
            Err(e) => return errors::store_error_to_response(e),
        }
    }

    let order_id = new_order_id(&email, Utc::now());
    let intent = PaymentIntent::create(provider, &services.config.price, &email, order_id);

    if let Some(key) = idempotency_key {
        if let Err(e) = services.intents.put(key, intent.clone()) {
            return errors::store_error_to_response(e);
        }
    }

    tracing::info!(order_id = %intent.order_id, "payment intent created");
    intent_response(&intent)
}

/// `POST /payments/webhook` — the provider confirming payment. Parameters
/// arrive in the query string; replies are plain text per the provider's
/// contract.
pub async fn webhook(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    let Some(provider) = &services.config.provider else {
        return errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "not_configured",
            "payment system not configured",
        );
    };

    let notification = match PaymentNotification::from_query(&params) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if !notification.verify(&provider.secret_key) {
        tracing::warn!(order_id = %notification.order_id, "webhook signature mismatch");
        return (StatusCode::FORBIDDEN, "Invalid signature").into_response();
    }

    let amount = match Money::from_units_str(
        &notification.amount_units,
        services.config.price.currency(),
    ) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let purchase = Purchase {
        order_id: notification.order_id.clone(),
        email: notification.email.clone(),
        amount,
        created_at: Utc::now(),
    };

    match services.purchases.record(purchase).await {
        Ok(true) => {
            tracing::info!(order_id = %notification.order_id, "purchase recorded");
        }
        Ok(false) => {
            tracing::info!(order_id = %notification.order_id, "duplicate webhook delivery");
        }
        Err(e) => {
            // Still acknowledge: the provider must not retry a payment we
            // cannot refuse.
            tracing::warn!(order_id = %notification.order_id, error = %e, "purchase store unavailable, acknowledging anyway");
        }
    }

    (StatusCode::OK, "OK").into_response()
}

fn parse_idempotency_key(
    headers: &HeaderMap,
) -> Result<Option<IdempotencyKey>, frota_core::DomainError> {
    headers
        .get("idempotency-key")
        .map(|v| {
            v.to_str()
                .map_err(|_| frota_core::DomainError::invalid_id("Idempotency-Key: not ASCII"))
                .and_then(str::parse)
        })
        .transpose()
}

fn intent_response(intent: &PaymentIntent) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "payment_url": intent.payment_url,
            "order_id": intent.order_id,
        })),
    )
        .into_response()
}
