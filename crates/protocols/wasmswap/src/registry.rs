//! Pool Registry
//!
//! Immutable snapshot of known pools indexed by unordered token pair.
//! Refreshing builds a new snapshot; readers holding an older `Arc`
//! keep a consistent view until they drop it.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::state::{Pool, Token};

/// Unordered pair key: the two token ids sorted
type PairKey = (String, String);

fn pair_key(a: &str, b: &str) -> PairKey {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// One snapshot of pool state
#[derive(Debug, Clone, Default)]
pub struct PoolRegistry {
    pools: Vec<Pool>,
    by_pair: HashMap<PairKey, usize>,
}

impl PoolRegistry {
    /// Index `pools`. A later pool for an already-seen pair replaces the earlier one.
    pub fn new(pools: Vec<Pool>) -> Self {
        let mut registry = Self::default();
        for pool in pools {
            registry.insert(pool);
        }
        registry
    }

    fn insert(&mut self, pool: Pool) {
        let key = pair_key(pool.token1.id(), pool.token2.id());
        match self.by_pair.get(&key) {
            Some(&idx) => {
                tracing::warn!(
                    pool = %pool.swap_address,
                    replaced = %self.pools[idx].swap_address,
                    "Duplicate pool for pair, keeping the later one"
                );
                self.pools[idx] = pool;
            }
            None => {
                self.by_pair.insert(key, self.pools.len());
                self.pools.push(pool);
            }
        }
    }

    /// All pools in registration order
    pub fn list_pools(&self) -> &[Pool] {
        &self.pools
    }

    /// Pool for the unordered pair (`token_a`, `token_b`), by token id
    pub fn get_pool(&self, token_a: &str, token_b: &str) -> Option<&Pool> {
        self.by_pair
            .get(&pair_key(token_a, token_b))
            .map(|&idx| &self.pools[idx])
    }

    /// Pool by its contract address
    pub fn by_address(&self, swap_address: &str) -> Option<&Pool> {
        self.pools
            .iter()
            .find(|p| p.swap_address.as_str() == swap_address)
    }

    /// Token metadata for a token id seen in any pool
    pub fn find_token(&self, token_id: &str) -> Option<&Token> {
        self.pools.iter().find_map(|p| {
            if p.token1.id() == token_id {
                Some(&p.token1)
            } else if p.token2.id() == token_id {
                Some(&p.token2)
            } else {
                None
            }
        })
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

/// Registry handle shared between request handlers and the refresher
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<Arc<PoolRegistry>>>,
}

impl SharedRegistry {
    pub fn new(registry: PoolRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(registry))),
        }
    }

    /// Current snapshot. Quotes computed from it never see a later refresh.
    pub async fn snapshot(&self) -> Arc<PoolRegistry> {
        self.inner.read().await.clone()
    }

    /// Swap in a freshly fetched snapshot
    pub async fn replace(&self, registry: PoolRegistry) {
        let count = registry.len();
        *self.inner.write().await = Arc::new(registry);
        tracing::info!(pools = count, "Pool registry refreshed");
    }
}
