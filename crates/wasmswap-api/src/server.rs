//! HTTP server: middleware stack and listener

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::routes::create_router;
use crate::AppState;

/// Router with CORS open to any origin and per-request tracing
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Bind to the configured `api_host:api_port` and serve until shutdown
pub async fn start_server(state: AppState) -> Result<(), std::io::Error> {
    let addr = state.config().api_addr();
    let network = state.config().network;
    let pools = state.pools().await.map(|r| r.len()).unwrap_or(0);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %network, pools, "wasmswap API listening");
    axum::serve(listener, app).await
}
