//! Liquidity withdrawal endpoint

use axum::{extract::State, routing::post, Json, Router};
use wasmswap::{compose_remove_liquidity, preview_remove_liquidity, SwapError};

use crate::dto::{
    protocol_failure, swap_failure, validate_sender, ApiFailure, RemoveLiquidityRequest,
    RemoveLiquidityResponse,
};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/remove", post(remove_liquidity))
}

/// POST /liquidity/remove - Compose an LP token redemption
async fn remove_liquidity(
    State(state): State<AppState>,
    Json(req): Json<RemoveLiquidityRequest>,
) -> Result<Json<RemoveLiquidityResponse>, ApiFailure> {
    validate_sender(&req.sender)?;
    let registry = state.pools().await.map_err(protocol_failure)?;
    let pool = registry
        .by_address(req.pool.as_str())
        .ok_or_else(|| swap_failure(SwapError::PoolNotFound(req.pool.to_string())))?;

    let preview = preview_remove_liquidity(pool, req.lp_amount).map_err(swap_failure)?;
    let bundle = compose_remove_liquidity(&req.sender, pool, req.lp_amount, state.fees())
        .map_err(swap_failure)?;
    let messages = bundle.encode().map_err(swap_failure)?;

    Ok(Json(RemoveLiquidityResponse {
        preview,
        operation: bundle.operation,
        fee: bundle.fee,
        messages,
    }))
}
