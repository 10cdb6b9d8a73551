//! Configuration + store wiring for the API process.

use std::sync::Arc;

use frota_checkout::ProviderConfig;
use frota_core::Money;
use frota_infra::{InMemoryIntentStore, InMemoryPromoStore, InMemoryPurchaseStore, PromoStore, PurchaseStore};

/// Static configuration for the API, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Payment provider credentials; `None` until the deployment sets them,
    /// in which case payment creation answers 500.
    pub provider: Option<ProviderConfig>,
    /// Price of the game.
    pub price: Money,
    /// Base URL the game artifact is served from; `None` disables the
    /// download endpoint. Deliberately external configuration, never a
    /// compiled-in address.
    pub download_base_url: Option<String>,
    /// Artifact file name appended to the base URL.
    pub artifact_name: String,
}

impl ApiConfig {
    /// Resolve configuration from the environment.
    ///
    /// - `FROTA_SHOP_ID` / `FROTA_SECRET_KEY`: provider credentials
    /// - `FROTA_PAY_URL`: hosted payment page (default `https://enot.io/pay`)
    /// - `FROTA_PRICE_MINOR` / `FROTA_CURRENCY`: price (default 2000 RUB)
    /// - `FROTA_DOWNLOAD_BASE_URL`: artifact base URL
    /// - `FROTA_ARTIFACT`: artifact name (default `frota-game.zip`)
    pub fn from_env() -> Self {
        let shop_id = std::env::var("FROTA_SHOP_ID").ok();
        let secret_key = std::env::var("FROTA_SECRET_KEY").ok();
        let pay_url =
            std::env::var("FROTA_PAY_URL").unwrap_or_else(|_| "https://enot.io/pay".to_string());

        let provider = match (shop_id, secret_key) {
            (Some(shop_id), Some(secret_key)) => {
                Some(ProviderConfig::new(shop_id, secret_key, pay_url))
            }
            _ => {
                tracing::warn!(
                    "FROTA_SHOP_ID/FROTA_SECRET_KEY not set; payment creation will answer 500"
                );
                None
            }
        };

        let price_minor = std::env::var("FROTA_PRICE_MINOR")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(2000);
        let currency = std::env::var("FROTA_CURRENCY").unwrap_or_else(|_| "RUB".to_string());
        let price = Money::new(price_minor, currency).unwrap_or_else(|e| {
            tracing::warn!("invalid price configuration ({e}); falling back to 20 RUB");
            Money::new(2000, "RUB").expect("default price is valid")
        });

        let download_base_url = std::env::var("FROTA_DOWNLOAD_BASE_URL").ok();
        if download_base_url.is_none() {
            tracing::warn!("FROTA_DOWNLOAD_BASE_URL not set; download endpoint will answer 500");
        }
        let artifact_name =
            std::env::var("FROTA_ARTIFACT").unwrap_or_else(|_| "frota-game.zip".to_string());

        Self {
            provider,
            price,
            download_base_url,
            artifact_name,
        }
    }

    /// Full artifact URL, if downloads are configured.
    pub fn download_url(&self) -> Option<String> {
        self.download_base_url
            .as_ref()
            .map(|base| format!("{}/{}", base.trim_end_matches('/'), self.artifact_name))
    }
}

/// Everything handlers need, behind one `Extension`.
pub struct AppServices {
    pub config: ApiConfig,
    pub purchases: Arc<dyn PurchaseStore>,
    pub promos: Arc<dyn PromoStore>,
    pub intents: InMemoryIntentStore,
}

impl AppServices {
    pub fn new(
        config: ApiConfig,
        purchases: Arc<dyn PurchaseStore>,
        promos: Arc<dyn PromoStore>,
    ) -> Self {
        Self {
            config,
            purchases,
            promos,
            intents: InMemoryIntentStore::new(),
        }
    }
}

/// Wire services from the environment.
///
/// `USE_PERSISTENT_STORES=true` selects Postgres (requires the `postgres`
/// feature and `DATABASE_URL`); anything else keeps purchases in memory.
pub async fn build_services() -> AppServices {
    let config = ApiConfig::from_env();

    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if use_persistent {
        #[cfg(feature = "postgres")]
        {
            return build_postgres_services(config).await;
        }
        #[cfg(not(feature = "postgres"))]
        tracing::warn!(
            "USE_PERSISTENT_STORES=true but postgres feature not enabled, falling back to in-memory"
        );
    }

    AppServices::new(
        config,
        Arc::new(InMemoryPurchaseStore::new()),
        Arc::new(InMemoryPromoStore::new()),
    )
}

#[cfg(feature = "postgres")]
async fn build_postgres_services(config: ApiConfig) -> AppServices {
    use frota_infra::{PostgresPromoStore, PostgresPurchaseStore};

    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");

    let pool = sqlx::PgPool::connect(&database_url)
        .await
        .expect("failed to connect to Postgres");

    AppServices::new(
        config,
        Arc::new(PostgresPurchaseStore::new(pool.clone())),
        Arc::new(PostgresPromoStore::new(pool)),
    )
}
