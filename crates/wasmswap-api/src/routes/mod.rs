//! API route definitions

mod health;
mod liquidity;
mod pools;
mod staking;
mod swap;

use axum::{routing::get, Router};

use crate::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/pools", pools::router())
        .nest("/swap", swap::router())
        .nest("/liquidity", liquidity::router())
        .nest("/staking", staking::router())
        .with_state(state)
}
