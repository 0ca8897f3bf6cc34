//! Staking contract queries

use serde_json::json;
use wasm_client::queries::query_typed;
use wasm_client::QueryClient;
use wasmswap_core::{Address, Uint128};

use crate::state::{
    Claim, ClaimsResponse, Duration, StakedValueResponse, StakingError, StakingPosition,
    TotalValueResponse, UnstakingDurationResponse,
};

pub async fn staked_value(
    client: &dyn QueryClient,
    contract: &Address,
    address: &Address,
) -> Result<Uint128, StakingError> {
    let query = json!({ "staked_value": { "address": address } });
    let resp: StakedValueResponse = query_typed(client, contract, &query).await?;
    Ok(resp.value)
}

pub async fn total_value(
    client: &dyn QueryClient,
    contract: &Address,
) -> Result<Uint128, StakingError> {
    let query = json!({ "total_value": {} });
    let resp: TotalValueResponse = query_typed(client, contract, &query).await?;
    Ok(resp.total)
}

pub async fn claims(
    client: &dyn QueryClient,
    contract: &Address,
    address: &Address,
) -> Result<Vec<Claim>, StakingError> {
    let query = json!({ "claims": { "address": address } });
    let resp: ClaimsResponse = query_typed(client, contract, &query).await?;
    Ok(resp.claims)
}

pub async fn unstaking_duration(
    client: &dyn QueryClient,
    contract: &Address,
) -> Result<Option<Duration>, StakingError> {
    let query = json!({ "unstaking_duration": {} });
    let resp: UnstakingDurationResponse = query_typed(client, contract, &query).await?;
    Ok(resp.duration)
}

/// Staked amount, contract total, and pending claims, queried concurrently
pub async fn position(
    client: &dyn QueryClient,
    contract: &Address,
    address: &Address,
) -> Result<StakingPosition, StakingError> {
    let (staked, total_staked, claims) = futures::try_join!(
        staked_value(client, contract, address),
        total_value(client, contract),
        claims(client, contract, address),
    )?;

    Ok(StakingPosition {
        contract: contract.clone(),
        address: address.clone(),
        staked,
        total_staked,
        claims,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use wasm_client::BroadcastResponse;
    use wasmswap_core::{ChainError, TxHash};

    struct MockStaking;

    #[async_trait]
    impl QueryClient for MockStaking {
        async fn query_smart(
            &self,
            contract: &Address,
            query: &serde_json::Value,
        ) -> wasm_client::Result<serde_json::Value> {
            if contract.as_str() != "juno1stake" {
                return Err(ChainError::QueryFailed {
                    contract: contract.to_string(),
                    message: "not found".into(),
                });
            }
            if let Some(q) = query.get("staked_value") {
                assert_eq!(q["address"], "juno1me");
                Ok(json!({ "value": "1500" }))
            } else if query.get("total_value").is_some() {
                Ok(json!({ "total": "90000" }))
            } else if query.get("claims").is_some() {
                Ok(json!({ "claims": [
                    { "amount": "250", "release_at": { "at_time": "1700000000000000000" } }
                ] }))
            } else if query.get("unstaking_duration").is_some() {
                Ok(json!({ "duration": { "time": 604800 } }))
            } else {
                Ok(serde_json::Value::Null)
            }
        }

        async fn get_tx(&self, tx_hash: &TxHash) -> wasm_client::Result<BroadcastResponse> {
            Err(ChainError::TxNotFound {
                tx_hash: tx_hash.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_individual_queries() {
        let contract = Address::new("juno1stake");
        let me = Address::new("juno1me");

        assert_eq!(staked_value(&MockStaking, &contract, &me).await.unwrap(), Uint128::new(1_500));
        assert_eq!(total_value(&MockStaking, &contract).await.unwrap(), Uint128::new(90_000));
        assert_eq!(
            unstaking_duration(&MockStaking, &contract).await.unwrap(),
            Some(Duration::Time(604_800))
        );
        let claims = claims(&MockStaking, &contract, &me).await.unwrap();
        assert_eq!(claims[0].release_at_secs(), Some(1_700_000_000));
    }

    #[tokio::test]
    async fn test_position() {
        let pos = position(&MockStaking, &Address::new("juno1stake"), &Address::new("juno1me"))
            .await
            .unwrap();
        assert_eq!(pos.staked, Uint128::new(1_500));
        assert_eq!(pos.total_staked, Uint128::new(90_000));
        assert_eq!(pos.claims.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_contract_fails() {
        let err = total_value(&MockStaking, &Address::new("juno1other")).await.unwrap_err();
        assert!(matches!(err, StakingError::Chain(ChainError::QueryFailed { .. })));
    }
}
