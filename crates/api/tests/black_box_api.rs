use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use frota_api::app::services::{ApiConfig, AppServices};
use frota_checkout::{PromoCode, ProviderConfig, sign};
use frota_core::OrderId;
use frota_infra::{InMemoryPromoStore, InMemoryPurchaseStore};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(services: Arc<AppServices>) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = frota_api::app::app_with_services(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn test_config() -> ApiConfig {
    ApiConfig {
        provider: Some(ProviderConfig::new(
            "shop-1",
            "s3cret",
            "https://pay.example/pay",
        )),
        price: frota_core::Money::new(2000, "RUB").unwrap(),
        download_base_url: Some("https://cdn.example/frota".to_string()),
        artifact_name: "frota-game.zip".to_string(),
    }
}

fn test_services(config: ApiConfig) -> (Arc<AppServices>, Arc<InMemoryPromoStore>) {
    let promos = Arc::new(InMemoryPromoStore::new());
    let services = Arc::new(AppServices::new(
        config,
        Arc::new(InMemoryPurchaseStore::new()),
        promos.clone(),
    ));
    (services, promos)
}

fn promo(code: &str, current_uses: u32, max_uses: u32, is_active: bool) -> PromoCode {
    PromoCode {
        code: code.to_string(),
        discount_percent: 10,
        discount_amount: 0,
        max_uses,
        current_uses,
        is_active,
    }
}

#[tokio::test]
async fn health_answers_ok() {
    let (services, _) = test_services(test_config());
    let srv = TestServer::spawn(services).await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn empty_email_is_rejected_without_creating_an_intent() {
    let (services, _) = test_services(test_config());
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/payments", srv.base_url))
        .json(&json!({ "email": "" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn payment_intent_carries_signed_provider_url() {
    let (services, _) = test_services(test_config());
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/payments", srv.base_url))
        .json(&json!({ "email": "player@example.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    let order_id: OrderId = body["order_id"].as_str().unwrap().parse().unwrap();
    let url = body["payment_url"].as_str().unwrap();
    assert!(url.starts_with("https://pay.example/pay?"));
    assert!(url.contains("m=shop-1"));
    assert!(url.contains("oa=20"));
    assert!(url.contains(&format!("o={order_id}")));
    assert!(url.contains(&format!("s={}", sign("shop-1", "20", "s3cret", &order_id))));
}

#[tokio::test]
async fn idempotency_key_replays_the_same_intent() {
    let (services, _) = test_services(test_config());
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();
    let key = frota_core::IdempotencyKey::new().to_string();

    let mut order_ids = Vec::new();
    for _ in 0..2 {
        let res = client
            .post(format!("{}/payments", srv.base_url))
            .header("Idempotency-Key", &key)
            .json(&json!({ "email": "player@example.com" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = res.json().await.unwrap();
        order_ids.push(body["order_id"].as_str().unwrap().to_string());
    }

    assert_eq!(order_ids[0], order_ids[1]);
}

#[tokio::test]
async fn unconfigured_provider_answers_500() {
    let mut config = test_config();
    config.provider = None;
    let (services, _) = test_services(config);
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/payments", srv.base_url))
        .json(&json!({ "email": "player@example.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_configured");
}

#[tokio::test]
async fn signed_webhook_unlocks_the_download() {
    let (services, _) = test_services(test_config());
    let srv = TestServer::spawn(services).await;
    let client = reqwest::Client::new();

    let order = OrderId::new("frot_1700000000_42").unwrap();
    let signature = sign("shop-1", "20", "s3cret", &order);

    let res = client
        .post(format!(
            "{}/payments/webhook?m=shop-1&oa=20&o={order}&s={signature}&cf=player@example.com",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "OK");

    let res = client
        .get(format!("{}/downloads?order_id={order}", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["download_url"],
        "https://cdn.example/frota/frota-game.zip"
    );
    assert_eq!(body["email"], "player@example.com");
}

#[tokio::test]
async fn webhook_with_bad_signature_is_refused() {
    let (services, _) = test_services(test_config());
    let srv = TestServer::spawn(services).await;
    let client = reqwest::Client::new();

    let order = OrderId::new("frot_1700000000_43").unwrap();
    let res = client
        .post(format!(
            "{}/payments/webhook?m=shop-1&oa=20&o={order}&s=deadbeef&cf=player@example.com",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.text().await.unwrap(), "Invalid signature");

    // The refused payment must not unlock anything.
    let res = client
        .get(format!("{}/downloads?order_id={order}", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_webhook_delivery_is_acknowledged_once_recorded() {
    let (services, _) = test_services(test_config());
    let srv = TestServer::spawn(services).await;
    let client = reqwest::Client::new();

    let order = OrderId::new("frot_1700000000_44").unwrap();
    let signature = sign("shop-1", "20", "s3cret", &order);
    let url = format!(
        "{}/payments/webhook?m=shop-1&oa=20&o={order}&s={signature}&cf=player@example.com",
        srv.base_url
    );

    for _ in 0..2 {
        let res = client.post(&url).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn download_requires_a_known_order_id() {
    let (services, _) = test_services(test_config());
    let srv = TestServer::spawn(services).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/downloads", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(format!("{}/downloads?order_id=frot_1_999", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn promo_check_covers_all_states() {
    let (services, promos) = test_services(test_config());
    promos.insert(promo("LAUNCH10", 1, 100, true));
    promos.insert(promo("GONE", 5, 5, true));
    promos.insert(promo("OLD", 0, 5, false));
    let srv = TestServer::spawn(services).await;
    let client = reqwest::Client::new();

    let check = |code: &str| {
        let client = client.clone();
        let url = format!("{}/promo/check", srv.base_url);
        let code = code.to_owned();
        async move {
            client
                .post(url)
                .json(&json!({ "promo_code": code }))
                .send()
                .await
                .unwrap()
        }
    };

    // Valid, with lowercase input normalized.
    let res = check(" launch10 ").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["valid"], true);
    assert_eq!(body["discount_percent"], 10);
    assert_eq!(body["remaining_uses"], 99);

    let res = check("").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = check("NOPE").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = check("GONE").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = check("OLD").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
