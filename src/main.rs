use std::env;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use service_record_engine::api::{create_router, AppState};
use service_record_engine::config::ConfigLoader;
use service_record_engine::derivation::RecordDeriver;
use service_record_engine::store::MemoryStore;

const DEFAULT_CONFIG_DIR: &str = "./config/default";
const DEFAULT_BIND: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_dir = env::var("ENGINE_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    info!(config_dir = %config_dir, "Loading configuration");
    let config = ConfigLoader::load(&config_dir)
        .with_context(|| format!("loading configuration from {}", config_dir))?
        .into_config();

    let store = match env::var("ENGINE_SEED_FILE") {
        Ok(seed_file) => {
            info!(seed_file = %seed_file, "Seeding in-memory store");
            MemoryStore::from_seed_file(&seed_file)
                .with_context(|| format!("loading seed data from {}", seed_file))?
        }
        Err(_) => MemoryStore::new(),
    };
    let store = Arc::new(store);

    let deriver = RecordDeriver::new(store.clone(), store.clone(), store, config);
    let app = create_router(AppState::new(deriver));

    let bind = env::var("ENGINE_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {}", bind))?;
    info!("Listening on {}", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
