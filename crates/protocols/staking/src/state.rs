//! Staking State Types

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_client::{ExecuteContract, Operation, StdFee};
use wasmswap::{OrderedMessage, SwapError};
use wasmswap_core::{Address, ChainError, Uint128};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// `{ "value": "<uint>" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakedValueResponse {
    pub value: Uint128,
}

/// `{ "total": "<uint>" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalValueResponse {
    pub total: Uint128,
}

/// Point at which a claim unlocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiration {
    AtHeight(u64),
    /// Nanoseconds since the unix epoch, as a decimal string
    AtTime(Uint128),
    Never {},
}

/// Unstaked tokens waiting out the unbonding period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub amount: Uint128,
    pub release_at: Expiration,
}

impl Claim {
    /// Release time in unix seconds, when time-based
    pub fn release_at_secs(&self) -> Option<u64> {
        match &self.release_at {
            Expiration::AtTime(nanos) => Some((nanos.u128() / NANOS_PER_SECOND as u128) as u64),
            _ => None,
        }
    }

    pub fn is_mature(&self, now_secs: u64, height: u64) -> bool {
        match &self.release_at {
            Expiration::AtTime(_) => self.release_at_secs().is_some_and(|t| t <= now_secs),
            Expiration::AtHeight(h) => *h <= height,
            Expiration::Never {} => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsResponse {
    pub claims: Vec<Claim>,
}

/// Unbonding period length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Duration {
    Height(u64),
    /// Seconds
    Time(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnstakingDurationResponse {
    pub duration: Option<Duration>,
}

/// One address's position in a staking contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingPosition {
    pub contract: Address,
    pub address: Address,
    pub staked: Uint128,
    pub total_staked: Uint128,
    pub claims: Vec<Claim>,
}

/// Composed, unsigned staking transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakingBundle {
    pub sender: Address,
    pub messages: Vec<OrderedMessage>,
    pub operation: Operation,
    pub fee: StdFee,
}

impl StakingBundle {
    pub fn encode(&self) -> Result<Vec<ExecuteContract>, StakingError> {
        Ok(wasmswap::msg::encode_all(&self.messages, &self.sender)?)
    }
}

/// Staking errors
#[derive(Debug, Error)]
pub enum StakingError {
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Transaction build failed: {0}")]
    TxBuild(String),
}

impl From<SwapError> for StakingError {
    fn from(e: SwapError) -> Self {
        match e {
            SwapError::ZeroAmount => StakingError::ZeroAmount,
            SwapError::Chain(c) => StakingError::Chain(c),
            other => StakingError::TxBuild(other.to_string()),
        }
    }
}

impl StakingError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "zero_amount",
            Self::Chain(_) => "chain_error",
            Self::TxBuild(_) => "tx_build_failed",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::ZeroAmount => 400,
            Self::Chain(_) => 503,
            Self::TxBuild(_) => 422,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_claims_response_parses_nanoseconds() {
        let resp: ClaimsResponse = serde_json::from_value(json!({
            "claims": [
                { "amount": "1500", "release_at": { "at_time": "1650000000123456789" } },
                { "amount": "20", "release_at": { "at_height": 900 } }
            ]
        }))
        .unwrap();

        assert_eq!(resp.claims.len(), 2);
        assert_eq!(resp.claims[0].amount, Uint128::new(1_500));
        assert_eq!(resp.claims[0].release_at_secs(), Some(1_650_000_000));
        assert!(resp.claims[0].is_mature(1_650_000_000, 0));
        assert!(!resp.claims[0].is_mature(1_649_999_999, 0));
        assert_eq!(resp.claims[1].release_at_secs(), None);
        assert!(resp.claims[1].is_mature(0, 900));
    }

    #[test]
    fn test_unstaking_duration_shape() {
        let resp: UnstakingDurationResponse =
            serde_json::from_value(json!({ "duration": { "time": 1209600 } })).unwrap();
        assert_eq!(resp.duration, Some(Duration::Time(1_209_600)));

        let resp: UnstakingDurationResponse =
            serde_json::from_value(json!({ "duration": null })).unwrap();
        assert_eq!(resp.duration, None);
    }
}
