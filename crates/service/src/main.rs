use std::sync::Arc;

use anyhow::Context;
use hermod_core::crypto::SecretCipher;
use hermod_events::delivery::Deliverer;
use hermod_events::{EventBus, EventRelay, SenderIdentity, WebhookDelivery};
use hermod_store::{Cache, ConfigStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::RelayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hermod=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = RelayConfig::from_env()?;
    tracing::info!(
        cache_ttl_secs = config.cache_ttl.as_secs(),
        relay_username = %config.relay_username,
        "Loaded relay configuration"
    );

    // --- Database ---
    let pool = hermod_db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    hermod_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    hermod_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Config/secret store ---
    let cipher = SecretCipher::from_secret(&config.encryption_key)
        .context("ENCRYPTION_KEY is unusable")?;
    let store = Arc::new(ConfigStore::new(
        pool.clone(),
        Cache::new(config.cache_ttl),
        Arc::new(cipher),
    ));

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    tracing::info!("Event bus created");

    // --- Relay ---
    let sender = SenderIdentity {
        username: config.relay_username.clone(),
        avatar_url: config.relay_avatar_url.clone(),
    };
    let deliverer: Arc<dyn Deliverer> = Arc::new(WebhookDelivery::new());
    let relay = Arc::new(EventRelay::new(Arc::clone(&store), deliverer, sender));
    let relay_handle = tokio::spawn(relay.run(event_bus.subscribe()));
    tracing::info!("Event relay started");

    // The host platform client publishes domain events onto `event_bus` and
    // owns the audit feed behind the reconciler. It is embedded alongside
    // this service and holds its own Arc clones of the bus and store.

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    tracing::info!("Shutdown signal received, draining in-flight deliveries");

    // Dropping the bus closes the broadcast channel. The relay stops
    // accepting events and waits for in-flight deliveries to finish or
    // fail naturally.
    drop(event_bus);
    relay_handle.await.context("Relay task panicked")?;

    pool.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
