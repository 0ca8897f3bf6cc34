//! Pool registry routes

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::dto::{protocol_failure, ApiFailure, PoolDto, PoolsResponse, RefreshResponse};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pools))
        .route("/refresh", post(refresh_pools))
}

/// GET /pools - Pools in the current snapshot
async fn list_pools(State(state): State<AppState>) -> Result<Json<PoolsResponse>, ApiFailure> {
    let registry = state.pools().await.map_err(protocol_failure)?;
    let pools: Vec<PoolDto> = registry.list_pools().iter().map(PoolDto::from).collect();
    let count = pools.len();
    Ok(Json(PoolsResponse { pools, count }))
}

/// POST /pools/refresh - Re-query every listed pool
async fn refresh_pools(State(state): State<AppState>) -> Json<RefreshResponse> {
    let loaded = state.refresh_pools().await;
    Json(RefreshResponse {
        listed: state.listings().len(),
        loaded,
    })
}
