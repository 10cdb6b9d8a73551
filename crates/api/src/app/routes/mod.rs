use axum::Router;

pub mod downloads;
pub mod payments;
pub mod promo;
pub mod system;

/// Router for all storefront endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/payments", payments::router())
        .nest("/downloads", downloads::router())
        .nest("/promo", promo::router())
}
