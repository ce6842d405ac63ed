use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use results_api::config::{self, StoreBackend};
use results_api::database::{DatabaseManager, MemoryStore, PgResultStore, ResultStore};
use results_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Results API in {:?} mode", config.environment);

    if results_api::is_production!() && config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set in production");
    }

    let store = open_store(config).await?;
    let state = AppState::new(store, config.api.base_path.clone());

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!(
        "Results API listening on http://{} (resource at {})",
        bind_addr,
        config.api.base_path
    );

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}

async fn open_store(config: &config::AppConfig) -> anyhow::Result<Arc<dyn ResultStore>> {
    match config.database.backend {
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;
            tracing::info!("Using Postgres result store");
            Ok(Arc::new(PgResultStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory result store; data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
