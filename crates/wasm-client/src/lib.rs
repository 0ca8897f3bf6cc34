//! wasm-client: CosmWasm chain boundary
//!
//! Contract queries and transaction lookups over the LCD REST API, plus the
//! signing/broadcast capability that an external wallet collaborator
//! implements. Everything crossing this boundary is plain JSON.

pub mod fees;
pub mod messages;
pub mod queries;

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use wasmswap_core::{Address, BlockHeight, ChainConfig, ChainError, TxHash};

pub use fees::{FeePolicy, Operation};
pub use messages::{BroadcastResponse, Coin, ExecuteContract, StdFee};

/// Default timeout for read-only chain requests (30 seconds).
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Result type for chain client operations
pub type Result<T> = std::result::Result<T, ChainError>;

/// Read-only access to contract state and included transactions
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Run a smart query against `contract` and return the raw JSON response
    async fn query_smart(
        &self,
        contract: &Address,
        query: &serde_json::Value,
    ) -> Result<serde_json::Value>;

    /// Look up an included transaction by hash
    async fn get_tx(&self, tx_hash: &TxHash) -> Result<BroadcastResponse>;
}

/// Signing and broadcast capability supplied by the wallet collaborator.
///
/// Implementations sign all `msgs` into one transaction and suspend until
/// the chain reports inclusion. They are responsible for serializing a
/// sender's transactions (account sequence ordering).
#[async_trait]
pub trait SigningClient: Send + Sync {
    async fn sign_and_broadcast(
        &self,
        sender: &Address,
        msgs: &[ExecuteContract],
        fee: &StdFee,
        memo: &str,
    ) -> Result<BroadcastResponse>;
}

/// LCD (REST) client for a Cosmos SDK chain with the wasm module
#[derive(Clone)]
pub struct LcdClient {
    http: reqwest::Client,
    config: ChainConfig,
    timeout: Duration,
}

impl LcdClient {
    /// Create a client with the default request timeout
    pub fn new(config: ChainConfig) -> Result<Self> {
        Self::with_timeout(config, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(config: ChainConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("wasmswap")
            .build()
            .map_err(|e| ChainError::Unreachable {
                url: format!("{}: {}", config.lcd_url, e),
            })?;

        Ok(Self {
            http,
            config,
            timeout,
        })
    }

    /// Get the current chain configuration
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Get latest block height
    pub async fn latest_height(&self) -> Result<BlockHeight> {
        let json = self
            .get_json("/cosmos/base/tendermint/v1beta1/blocks/latest")
            .await?;
        parse_height(&json["block"]["header"]["height"])
            .ok_or_else(|| ChainError::ParseError("Missing block height".to_string()))
    }

    /// Check if the endpoint answers
    pub async fn is_online(&self) -> bool {
        self.latest_height().await.is_ok()
    }

    async fn get_json(&self, path: &str) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.config.lcd_url.trim_end_matches('/'), path);
        tracing::debug!(%url, "LCD request");

        let response = timed_request(self.timeout, async {
            self.http.get(&url).send().await.map_err(|e| ChainError::Unreachable {
                url: format!("{}: {}", url, e),
            })
        })
        .await?;

        let status = response.status();
        let text = timed_request(self.timeout, async {
            response
                .text()
                .await
                .map_err(|e| ChainError::ParseError(format!("Failed to read response: {}", e)))
        })
        .await?;

        // Error bodies are not always JSON; keep them as plain strings
        let body: serde_json::Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) if status.is_success() => {
                return Err(ChainError::ParseError(format!(
                    "Failed to parse response: {}",
                    e
                )))
            }
            Err(_) => serde_json::Value::String(text),
        };

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ChainError::ApiError {
                message: format!("404: {}", error_message(&body)),
            });
        }
        if !status.is_success() {
            return Err(ChainError::ApiError {
                message: format!("{}: {}", status.as_u16(), error_message(&body)),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl QueryClient for LcdClient {
    async fn query_smart(
        &self,
        contract: &Address,
        query: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let encoded = URL_SAFE.encode(query.to_string());
        let path = format!("/cosmwasm/wasm/v1/contract/{}/smart/{}", contract, encoded);

        let mut json = self.get_json(&path).await.map_err(|e| match e {
            ChainError::ApiError { message } => ChainError::QueryFailed {
                contract: contract.to_string(),
                message,
            },
            other => other,
        })?;

        Ok(json["data"].take())
    }

    async fn get_tx(&self, tx_hash: &TxHash) -> Result<BroadcastResponse> {
        let path = format!("/cosmos/tx/v1beta1/txs/{}", tx_hash);
        let json = self.get_json(&path).await.map_err(|e| match e {
            ChainError::ApiError { message } if message.starts_with("404") => {
                ChainError::TxNotFound {
                    tx_hash: tx_hash.to_string(),
                }
            }
            other => other,
        })?;

        parse_tx_response(&json["tx_response"])
    }
}

/// Wrap a chain request with a timeout. A timeout becomes `ChainError::Timeout`.
pub async fn timed_request<T>(
    timeout: Duration,
    fut: impl std::future::Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| ChainError::Timeout {
            secs: timeout.as_secs(),
        })?
}

/// Parse an LCD `tx_response` object into a `BroadcastResponse`.
///
/// Heights and gas arrive as decimal strings; the code is a number.
pub fn parse_tx_response(tx: &serde_json::Value) -> Result<BroadcastResponse> {
    let tx_hash = tx["txhash"]
        .as_str()
        .ok_or_else(|| ChainError::ParseError("Missing txhash".to_string()))?;
    let height = parse_height(&tx["height"])
        .ok_or_else(|| ChainError::ParseError("Missing height".to_string()))?;

    Ok(BroadcastResponse {
        tx_hash: TxHash::new(tx_hash),
        height,
        code: tx["code"].as_u64().unwrap_or(0) as u32,
        codespace: tx["codespace"].as_str().unwrap_or_default().to_string(),
        raw_log: tx["raw_log"].as_str().unwrap_or_default().to_string(),
        gas_wanted: parse_height(&tx["gas_wanted"]).unwrap_or(0),
        gas_used: parse_height(&tx["gas_used"]).unwrap_or(0),
    })
}

fn parse_height(value: &serde_json::Value) -> Option<u64> {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .or_else(|| value.as_u64())
}

fn error_message(body: &serde_json::Value) -> String {
    body["message"]
        .as_str()
        .or_else(|| body.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| body.to_string())
}
