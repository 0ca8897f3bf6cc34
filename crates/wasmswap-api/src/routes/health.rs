//! Health check endpoint

use axum::{extract::State, Json};

use crate::dto::HealthResponse;
use crate::AppState;

/// GET /health - Basic health check
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let pools = state.pools().await.map(|r| r.len()).unwrap_or(0);
    Json(HealthResponse::new(pools))
}
