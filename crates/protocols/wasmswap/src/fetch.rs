//! Pool state fetching
//!
//! Token metadata comes from the caller as `PoolListing`s; reserves and
//! LP details come from each pool's `{"info":{}}` query.

use std::path::Path;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use wasm_client::queries::query_typed;
use wasm_client::QueryClient;
use wasmswap_core::Address;

use crate::msg::{Denom, InfoResponse, QueryMsg};
use crate::registry::{PoolRegistry, SharedRegistry};
use crate::state::{Fee, Pool, SwapError, Token};

/// A known pool contract and the metadata of its two tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolListing {
    pub swap_address: Address,
    pub token1: Token,
    pub token2: Token,
    #[serde(default)]
    pub fee: Fee,
}

/// Read pool listings from a JSON array file
pub fn load_listings(path: &Path) -> wasmswap_core::Result<Vec<PoolListing>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        wasmswap_core::Error::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        wasmswap_core::Error::Serialization(format!("Invalid pool list {}: {}", path.display(), e))
    })
}

fn check_denom(expected: &Token, reported: &Denom, pool: &Address) -> Result<(), SwapError> {
    if expected.id() != reported.id() {
        return Err(SwapError::InvalidToken(format!(
            "pool {} reports {} where {} was listed",
            pool,
            reported.id(),
            expected.id()
        )));
    }
    Ok(())
}

/// Combine a listing with the pool's reported state
pub fn parse_pool(listing: &PoolListing, info: InfoResponse) -> Result<Pool, SwapError> {
    check_denom(&listing.token1, &info.token1_denom, &listing.swap_address)?;
    check_denom(&listing.token2, &info.token2_denom, &listing.swap_address)?;

    Ok(Pool {
        swap_address: listing.swap_address.clone(),
        token1: listing.token1.clone(),
        token2: listing.token2.clone(),
        token1_reserve: info.token1_reserve,
        token2_reserve: info.token2_reserve,
        lp_token_address: info.lp_token_address,
        lp_token_supply: info.lp_token_supply,
        fee: listing.fee,
    })
}

/// Query one pool's current state
pub async fn fetch_pool(
    client: &dyn QueryClient,
    listing: &PoolListing,
) -> Result<Pool, SwapError> {
    let info: InfoResponse = query_typed(client, &listing.swap_address, &QueryMsg::Info {}).await?;
    parse_pool(listing, info)
}

/// Query all listed pools concurrently, skipping any that fail
pub async fn discover_pools(client: &dyn QueryClient, listings: &[PoolListing]) -> Vec<Pool> {
    let results = join_all(listings.iter().map(|listing| fetch_pool(client, listing))).await;

    let mut pools = Vec::with_capacity(listings.len());
    for (listing, result) in listings.iter().zip(results) {
        match result {
            Ok(pool) => pools.push(pool),
            Err(e) => {
                tracing::warn!(pool = %listing.swap_address, error = %e, "Failed to fetch pool");
            }
        }
    }

    tracing::info!("Fetched {} of {} pools", pools.len(), listings.len());
    pools
}

/// Fetch all listings and swap the result into `registry` as a new snapshot.
///
/// A listing whose query fails keeps its pool from the previous snapshot,
/// so a transient endpoint failure leaves stale reserves rather than a hole.
/// Returns the number of pools fetched fresh.
pub async fn refresh_registry(
    client: &dyn QueryClient,
    listings: &[PoolListing],
    registry: &SharedRegistry,
) -> usize {
    let previous = registry.snapshot().await;
    let results = join_all(listings.iter().map(|listing| fetch_pool(client, listing))).await;

    let mut pools = Vec::with_capacity(listings.len());
    let mut fresh = 0;
    for (listing, result) in listings.iter().zip(results) {
        match result {
            Ok(pool) => {
                fresh += 1;
                pools.push(pool);
            }
            Err(e) => match previous.by_address(listing.swap_address.as_str()) {
                Some(stale) => {
                    tracing::warn!(
                        pool = %listing.swap_address,
                        error = %e,
                        "Refresh failed; keeping previous state"
                    );
                    pools.push(stale.clone());
                }
                None => {
                    tracing::warn!(
                        pool = %listing.swap_address,
                        error = %e,
                        "Failed to fetch pool"
                    );
                }
            },
        }
    }

    tracing::info!(fresh, kept = pools.len() - fresh, listed = listings.len(), "Refreshed pools");
    registry.replace(PoolRegistry::new(pools)).await;
    fresh
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use wasm_client::BroadcastResponse;
    use wasmswap_core::{ChainError, TxHash, Uint128};

    struct MockPools;

    #[async_trait]
    impl QueryClient for MockPools {
        async fn query_smart(
            &self,
            contract: &Address,
            query: &serde_json::Value,
        ) -> wasm_client::Result<serde_json::Value> {
            assert_eq!(query, &serde_json::json!({ "info": {} }));
            match contract.as_str() {
                "juno1rawpool" => Ok(serde_json::json!({
                    "token1_reserve": "1000000",
                    "token1_denom": { "native": "ujuno" },
                    "token2_reserve": "500000",
                    "token2_denom": { "cw20": "juno1raw" },
                    "lp_token_supply": "700000",
                    "lp_token_address": "juno1rawlp"
                })),
                "juno1wrongpool" => Ok(serde_json::json!({
                    "token1_reserve": "1",
                    "token1_denom": { "native": "uatom" },
                    "token2_reserve": "1",
                    "token2_denom": { "cw20": "juno1neta" },
                    "lp_token_supply": "1",
                    "lp_token_address": "juno1wronglp"
                })),
                other => Err(ChainError::QueryFailed {
                    contract: other.to_string(),
                    message: "contract not found".into(),
                }),
            }
        }

        async fn get_tx(&self, tx_hash: &TxHash) -> wasm_client::Result<BroadcastResponse> {
            Err(ChainError::TxNotFound {
                tx_hash: tx_hash.to_string(),
            })
        }
    }

    fn listing(addr: &str, token2: Token) -> PoolListing {
        PoolListing {
            swap_address: Address::new(addr),
            token1: Token::native("JUNO", "ujuno", 6),
            token2,
            fee: Fee::default(),
        }
    }

    #[tokio::test]
    async fn test_fetch_pool() {
        let raw = listing("juno1rawpool", Token::cw20("RAW", "juno1raw", 6));
        let pool = fetch_pool(&MockPools, &raw).await.unwrap();
        assert_eq!(pool.token1_reserve, Uint128::new(1_000_000));
        assert_eq!(pool.token2_reserve, Uint128::new(500_000));
        assert_eq!(pool.lp_token_address.as_str(), "juno1rawlp");
        assert_eq!(pool.lp_token_supply, Uint128::new(700_000));
    }

    #[tokio::test]
    async fn test_discover_skips_failures() {
        let listings = vec![
            listing("juno1rawpool", Token::cw20("RAW", "juno1raw", 6)),
            listing("juno1missing", Token::cw20("X", "juno1x", 6)),
            listing("juno1wrongpool", Token::cw20("NETA", "juno1neta", 6)),
        ];
        let pools = discover_pools(&MockPools, &listings).await;
        assert_eq!(pools.len(), 1);
        assert_eq!(pools[0].swap_address.as_str(), "juno1rawpool");

        let shared = SharedRegistry::default();
        assert_eq!(refresh_registry(&MockPools, &listings, &shared).await, 1);
        assert!(shared.snapshot().await.get_pool("ujuno", "juno1raw").is_some());
    }

    /// Answers the first `healthy` queries, then times out
    struct FlakyPools {
        healthy: AtomicUsize,
    }

    #[async_trait]
    impl QueryClient for FlakyPools {
        async fn query_smart(
            &self,
            contract: &Address,
            query: &serde_json::Value,
        ) -> wasm_client::Result<serde_json::Value> {
            let left = self.healthy.load(Ordering::SeqCst);
            if left == 0 {
                return Err(ChainError::Timeout { secs: 30 });
            }
            self.healthy.store(left - 1, Ordering::SeqCst);
            MockPools.query_smart(contract, query).await
        }

        async fn get_tx(&self, tx_hash: &TxHash) -> wasm_client::Result<BroadcastResponse> {
            MockPools.get_tx(tx_hash).await
        }
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_pools() {
        let listings = vec![listing("juno1rawpool", Token::cw20("RAW", "juno1raw", 6))];
        let client = FlakyPools {
            healthy: AtomicUsize::new(1),
        };
        let shared = SharedRegistry::default();

        assert_eq!(refresh_registry(&client, &listings, &shared).await, 1);
        assert_eq!(shared.snapshot().await.len(), 1);

        assert_eq!(refresh_registry(&client, &listings, &shared).await, 0);
        let snapshot = shared.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        let pool = snapshot.get_pool("ujuno", "juno1raw").unwrap();
        assert_eq!(pool.token2_reserve, Uint128::new(500_000));
    }

    #[test]
    fn test_listing_json() {
        let listings: Vec<PoolListing> = serde_json::from_value(serde_json::json!([{
            "swap_address": "juno1rawpool",
            "token1": { "symbol": "JUNO", "decimals": 6, "type": "native", "denom": "ujuno" },
            "token2": { "symbol": "RAW", "decimals": 6, "type": "cw20", "address": "juno1raw" }
        }]))
        .unwrap();
        assert_eq!(listings[0].fee, Fee::default());
        assert!(listings[0].token1.is_native());
        assert_eq!(listings[0].token2.id(), "juno1raw");
    }
}
