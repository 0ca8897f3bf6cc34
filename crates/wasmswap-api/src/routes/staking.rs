//! Staking position endpoint

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use staking::StakingPosition;
use wasmswap_core::Address;

use crate::dto::{staking_failure, validate_sender, ApiFailure};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:contract/:address", get(get_position))
}

/// GET /staking/:contract/:address - Staked amount and pending claims
async fn get_position(
    State(state): State<AppState>,
    Path((contract, address)): Path<(String, String)>,
) -> Result<Json<StakingPosition>, ApiFailure> {
    let contract = Address::new(contract);
    let address = Address::new(address);
    validate_sender(&address)?;

    let position = staking::position(state.client(), &contract, &address)
        .await
        .map_err(staking_failure)?;
    Ok(Json(position))
}
