//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use wasm_client::{FeePolicy, LcdClient, QueryClient};
use wasmswap::{
    load_listings, refresh_registry, PoolListing, PoolRegistry, SharedRegistry, Slippage,
};
use wasmswap_core::{AppConfig, ProtocolError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    fees: FeePolicy,
    client: Arc<dyn QueryClient>,
    registry: SharedRegistry,
    listings: Vec<PoolListing>,
}

impl AppState {
    /// Create state over an existing query client. The registry starts empty.
    pub fn new(
        config: AppConfig,
        client: Arc<dyn QueryClient>,
        listings: Vec<PoolListing>,
    ) -> Self {
        let fees = FeePolicy::new(&config.chain, config.gas);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                fees,
                client,
                registry: SharedRegistry::default(),
                listings,
            }),
        }
    }

    /// Build the LCD client and read the pool listings named by `config`
    pub fn from_config(config: AppConfig) -> wasmswap_core::Result<Self> {
        let client = LcdClient::with_timeout(
            config.chain.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let listings = match &config.pools_file {
            Some(path) => load_listings(path)?,
            None => {
                tracing::warn!("No pools_file configured; registry will stay empty");
                Vec::new()
            }
        };
        Ok(Self::new(config, Arc::new(client), listings))
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn fees(&self) -> &FeePolicy {
        &self.inner.fees
    }

    pub fn client(&self) -> &dyn QueryClient {
        self.inner.client.as_ref()
    }

    pub fn listings(&self) -> &[PoolListing] {
        &self.inner.listings
    }

    /// Slippage used when a request does not name one
    pub fn default_slippage(&self) -> Slippage {
        Slippage::from_bps(self.inner.config.default_slippage_bps).unwrap_or(Slippage::ZERO)
    }

    /// Current registry snapshot, or an error while no pools are loaded
    pub async fn pools(&self) -> Result<Arc<PoolRegistry>, ProtocolError> {
        let snapshot = self.inner.registry.snapshot().await;
        if snapshot.is_empty() {
            return Err(ProtocolError::StateUnavailable {
                reason: "pool registry is empty".to_string(),
            });
        }
        Ok(snapshot)
    }

    /// Re-fetch every listed pool and publish a new snapshot
    pub async fn refresh_pools(&self) -> usize {
        refresh_registry(self.client(), &self.inner.listings, &self.inner.registry).await
    }
}
