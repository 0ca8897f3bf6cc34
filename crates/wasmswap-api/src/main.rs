//! wasmswap-api server binary
//!
//! Usage: `wasmswap-api [config.json]`. The path may also come from
//! `WASMSWAP_CONFIG`; without either the defaults are used.

use anyhow::Context;
use wasmswap_api::{start_server, AppState};
use wasmswap_core::AppConfig;

fn load_config() -> anyhow::Result<AppConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("WASMSWAP_CONFIG").ok());

    match path {
        Some(path) => {
            tracing::info!(%path, "Loading configuration");
            AppConfig::load(&path).with_context(|| format!("loading {}", path))
        }
        None => Ok(AppConfig::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wasmswap=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .init();

    let config = load_config()?;
    tracing::info!(network = %config.network, lcd = %config.chain.lcd_url, "Starting wasmswap API");

    let state = AppState::from_config(config)?;
    let loaded = state.refresh_pools().await;
    if loaded < state.listings().len() {
        tracing::warn!(loaded, listed = state.listings().len(), "Some pools failed to load");
    }

    start_server(state).await?;
    Ok(())
}
