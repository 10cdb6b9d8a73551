//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `services.rs`: configuration + store wiring (in-memory or Postgres)
//! - `routes/`: HTTP routes + handlers (one file per endpoint area)
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router from environment configuration (public
/// entrypoint used by `main.rs`).
pub async fn build_app() -> Router {
    let services = Arc::new(services::build_services().await);
    app_with_services(services)
}

/// Build the router around explicit services (tests construct these with
/// in-memory stores and fixed configuration).
pub fn app_with_services(services: Arc<AppServices>) -> Router {
    // The storefront page is served from another origin; every endpoint
    // here is called cross-origin, including the provider webhook.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router().layer(Extension(services)))
        .layer(cors)
}
