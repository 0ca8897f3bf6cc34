//! Data Transfer Objects for API requests and responses

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use staking::StakingError;
use wasm_client::{ExecuteContract, Operation, StdFee};
use wasmswap::{Pool, Quote, RedeemPreview, Route, SwapDirection, SwapError, Token, TwoHopMode};
use wasmswap_core::{Address, ProtocolError, TxError, Uint128};

/// Error half of every handler result
pub type ApiFailure = (StatusCode, Json<ApiError>);

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub pools: usize,
}

impl HealthResponse {
    pub fn new(pools: usize) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            pools,
        }
    }
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

fn failure(status: u16, code: &str, message: String) -> ApiFailure {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ApiError::new(code, message)))
}

pub fn swap_failure(e: SwapError) -> ApiFailure {
    failure(e.status_code(), e.error_code(), e.to_string())
}

pub fn staking_failure(e: StakingError) -> ApiFailure {
    failure(e.status_code(), e.error_code(), e.to_string())
}

pub fn protocol_failure(e: ProtocolError) -> ApiFailure {
    failure(e.status_code(), e.error_code(), e.to_string())
}

pub fn tx_failure(e: TxError) -> ApiFailure {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError::new(e.error_code(), e.to_string())),
    )
}

/// Reject senders that are not bech32-shaped
pub fn validate_sender(sender: &Address) -> Result<(), ApiFailure> {
    if sender.prefix().is_none() {
        return Err(tx_failure(TxError::InvalidAddress {
            address: sender.to_string(),
        }));
    }
    Ok(())
}

/// Pool summary with derived price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolDto {
    pub swap_address: Address,
    pub token1: Token,
    pub token2: Token,
    pub token1_reserve: Uint128,
    pub token2_reserve: Uint128,
    pub lp_token_address: Address,
    pub lp_token_supply: Uint128,
    pub fee_percent: f64,
    /// token2 per token1 at the current reserves, in raw units
    pub price: f64,
}

impl From<&Pool> for PoolDto {
    fn from(pool: &Pool) -> Self {
        let price = if pool.token1_reserve.is_zero() {
            0.0
        } else {
            pool.token2_reserve.u128() as f64 / pool.token1_reserve.u128() as f64
        };
        Self {
            swap_address: pool.swap_address.clone(),
            token1: pool.token1.clone(),
            token2: pool.token2.clone(),
            token1_reserve: pool.token1_reserve,
            token2_reserve: pool.token2_reserve,
            lp_token_address: pool.lp_token_address.clone(),
            lp_token_supply: pool.lp_token_supply,
            fee_percent: pool.fee.percent(),
            price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolsResponse {
    pub pools: Vec<PoolDto>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub listed: usize,
    pub loaded: usize,
}

/// Route lookup request; tokens are denoms or cw20 addresses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteHopDto {
    pub pool: Address,
    pub token_in: String,
    pub token_out: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    /// Symbols along the path, e.g. `RAW -> JUNO -> NETA`
    pub path: String,
    pub hops: Vec<RouteHopDto>,
}

impl From<&Route> for RouteResponse {
    fn from(route: &Route) -> Self {
        Self {
            path: route.to_string(),
            hops: route
                .hops
                .iter()
                .map(|hop| RouteHopDto {
                    pool: hop.pool.swap_address.clone(),
                    token_in: hop.token_in().id().to_string(),
                    token_out: hop.token_out().id().to_string(),
                })
                .collect(),
        }
    }
}

fn exact_in() -> SwapDirection {
    SwapDirection::ExactIn
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub from: String,
    pub to: String,
    pub amount: Uint128,
    #[serde(default = "exact_in")]
    pub direction: SwapDirection,
    /// Falls back to the configured default
    #[serde(default)]
    pub slippage_bps: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub route: RouteResponse,
    pub quote: Quote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeRequest {
    pub sender: Address,
    pub from: String,
    pub to: String,
    pub amount: Uint128,
    #[serde(default = "exact_in")]
    pub direction: SwapDirection,
    #[serde(default)]
    pub slippage_bps: Option<u32>,
    #[serde(default)]
    pub two_hop_mode: TwoHopMode,
}

/// Unsigned transaction ready for the wallet to sign
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeResponse {
    pub route: RouteResponse,
    pub quote: Quote,
    pub operation: Operation,
    pub fee: StdFee,
    pub messages: Vec<ExecuteContract>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveLiquidityRequest {
    pub sender: Address,
    pub pool: Address,
    pub lp_amount: Uint128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveLiquidityResponse {
    pub preview: RedeemPreview,
    pub operation: Operation,
    pub fee: StdFee,
    pub messages: Vec<ExecuteContract>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_failure_status() {
        let (status, Json(body)) = swap_failure(SwapError::NoRoute {
            from: "RAW".into(),
            to: "ATOM".into(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "no_route");

        let (status, _) = swap_failure(SwapError::TimeoutOrUnknown { tx_hash: None });
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_validate_sender() {
        assert!(validate_sender(&Address::new("juno1abc")).is_ok());
        let (status, Json(body)) = validate_sender(&Address::new("nobech")).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "invalid_address");
    }

    #[test]
    fn test_quote_request_defaults() {
        let req: QuoteRequest =
            serde_json::from_str(r#"{"from":"ujuno","to":"juno1raw","amount":"1000"}"#).unwrap();
        assert_eq!(req.direction, SwapDirection::ExactIn);
        assert_eq!(req.slippage_bps, None);
        assert_eq!(req.amount, Uint128::new(1_000));
    }
}
