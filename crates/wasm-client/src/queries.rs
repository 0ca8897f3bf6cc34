//! Typed contract query helpers

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasmswap_core::{Address, ChainError};

use crate::{QueryClient, Result};

/// Run a smart query with a typed request and typed response
pub async fn query_typed<Q, R>(client: &dyn QueryClient, contract: &Address, query: &Q) -> Result<R>
where
    Q: Serialize + ?Sized + Sync,
    R: DeserializeOwned,
{
    let request = serde_json::to_value(query)
        .map_err(|e| ChainError::ParseError(format!("Failed to encode query: {}", e)))?;

    let response = client.query_smart(contract, &request).await?;

    serde_json::from_value(response).map_err(|e| ChainError::QueryFailed {
        contract: contract.to_string(),
        message: format!("Unexpected response shape: {}", e),
    })
}
