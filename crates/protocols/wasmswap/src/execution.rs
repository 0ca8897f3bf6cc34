//! Execution Client
//!
//! Submits a composed bundle as one transaction and classifies the
//! outcome. Nothing is retried here: a failed swap needs a fresh quote,
//! and a timed out one may still land.

use std::sync::Arc;
use std::time::Duration;

use wasm_client::{BroadcastResponse, QueryClient, SigningClient, StdFee};
use wasmswap_core::{Address, ChainError, TxHash};

use crate::composer::SwapBundle;
use crate::liquidity::LiquidityBundle;
use crate::msg::{encode_all, OrderedMessage};
use crate::state::{SwapError, TxResult};

/// Default time to wait for inclusion (60 seconds)
const DEFAULT_BROADCAST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct ExecutionClient {
    signer: Arc<dyn SigningClient>,
    query: Arc<dyn QueryClient>,
    timeout: Duration,
    memo: String,
}

impl ExecutionClient {
    pub fn new(signer: Arc<dyn SigningClient>, query: Arc<dyn QueryClient>) -> Self {
        Self {
            signer,
            query,
            timeout: DEFAULT_BROADCAST_TIMEOUT,
            memo: String::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Sign and broadcast `messages` as one atomic transaction, waiting for inclusion
    pub async fn broadcast(
        &self,
        sender: &Address,
        messages: &[OrderedMessage],
        fee: &StdFee,
    ) -> Result<TxResult, SwapError> {
        if messages.is_empty() {
            return Err(SwapError::TxBuild("Empty message bundle".to_string()));
        }
        let msgs = encode_all(messages, sender)?;

        tracing::info!(
            %sender,
            messages = msgs.len(),
            gas = fee.gas,
            "Broadcasting transaction"
        );

        let outcome = tokio::time::timeout(
            self.timeout,
            self.signer.sign_and_broadcast(sender, &msgs, fee, &self.memo),
        )
        .await;

        match outcome {
            Err(_) => {
                tracing::warn!(
                    %sender,
                    secs = self.timeout.as_secs(),
                    "Broadcast timed out; outcome unknown"
                );
                Err(SwapError::TimeoutOrUnknown { tx_hash: None })
            }
            Ok(Err(e)) => Err(unknown_or_chain(e, None)),
            Ok(Ok(resp)) => classify(resp),
        }
    }

    pub async fn execute_swap(&self, bundle: &SwapBundle) -> Result<TxResult, SwapError> {
        self.broadcast(&bundle.sender, &bundle.messages, &bundle.fee)
            .await
    }

    pub async fn execute_liquidity(&self, bundle: &LiquidityBundle) -> Result<TxResult, SwapError> {
        self.broadcast(&bundle.sender, &bundle.messages, &bundle.fee)
            .await
    }

    /// Look up a transaction whose broadcast outcome was unknown
    pub async fn resolve(&self, tx_hash: &TxHash) -> Result<TxResult, SwapError> {
        match self.query.get_tx(tx_hash).await {
            Ok(resp) => classify(resp),
            Err(e) => Err(unknown_or_chain(e, Some(tx_hash.clone()))),
        }
    }
}

fn unknown_or_chain(err: ChainError, tx_hash: Option<TxHash>) -> SwapError {
    match err {
        e if e.is_timeout() => SwapError::TimeoutOrUnknown { tx_hash },
        ChainError::TxNotFound { tx_hash: hash } => SwapError::TimeoutOrUnknown {
            tx_hash: Some(tx_hash.unwrap_or_else(|| TxHash::new(hash))),
        },
        other => SwapError::Chain(other),
    }
}

/// Map an included transaction to success or `ExecutionFailed`
pub fn classify(resp: BroadcastResponse) -> Result<TxResult, SwapError> {
    if resp.is_deliver_tx_failure() {
        tracing::error!(
            tx_hash = %resp.tx_hash,
            height = resp.height,
            code = resp.code,
            raw_log = %resp.raw_log,
            "Transaction failed"
        );
        return Err(SwapError::ExecutionFailed {
            code: resp.code,
            raw_log: resp.raw_log,
            tx_hash: resp.tx_hash,
            height: resp.height,
        });
    }

    tracing::info!(
        tx_hash = %resp.tx_hash,
        height = resp.height,
        gas_used = resp.gas_used,
        "Transaction included"
    );
    Ok(TxResult {
        tx_hash: resp.tx_hash,
        height: resp.height,
        code: resp.code,
        raw_log: resp.raw_log,
        gas_used: resp.gas_used,
    })
}
