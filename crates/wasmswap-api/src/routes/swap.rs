//! Route, quote, and compose endpoints

use axum::{extract::State, routing::post, Json, Router};
use wasmswap::{compose_swap, resolve_route_by_id, Slippage, SwapIntent};

use crate::dto::{
    protocol_failure, swap_failure, validate_sender, ApiFailure, ComposeRequest, ComposeResponse,
    QuoteRequest, QuoteResponse, RouteRequest, RouteResponse,
};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/route", post(find_route))
        .route("/quote", post(get_quote))
        .route("/compose", post(compose_tx))
}

fn slippage(state: &AppState, bps: Option<u32>) -> Result<Slippage, ApiFailure> {
    match bps {
        Some(bps) => Slippage::from_bps(bps).map_err(swap_failure),
        None => Ok(state.default_slippage()),
    }
}

/// POST /swap/route - Resolve the path between two tokens
async fn find_route(
    State(state): State<AppState>,
    Json(req): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, ApiFailure> {
    let registry = state.pools().await.map_err(protocol_failure)?;
    let route = resolve_route_by_id(&registry, &req.from, &req.to, &state.config().base_token)
        .map_err(swap_failure)?;
    Ok(Json(RouteResponse::from(&route)))
}

/// POST /swap/quote - Price a swap without composing it
async fn get_quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, ApiFailure> {
    let slippage = slippage(&state, req.slippage_bps)?;
    let registry = state.pools().await.map_err(protocol_failure)?;
    let route = resolve_route_by_id(&registry, &req.from, &req.to, &state.config().base_token)
        .map_err(swap_failure)?;

    let quote = wasmswap::quote(&route, req.amount, req.direction)
        .map_err(swap_failure)?
        .with_slippage(slippage);

    Ok(Json(QuoteResponse {
        route: RouteResponse::from(&route),
        quote,
    }))
}

/// POST /swap/compose - Build the unsigned messages for a swap
async fn compose_tx(
    State(state): State<AppState>,
    Json(req): Json<ComposeRequest>,
) -> Result<Json<ComposeResponse>, ApiFailure> {
    validate_sender(&req.sender)?;
    let slippage = slippage(&state, req.slippage_bps)?;
    let registry = state.pools().await.map_err(protocol_failure)?;
    let route = resolve_route_by_id(&registry, &req.from, &req.to, &state.config().base_token)
        .map_err(swap_failure)?;

    let intent = SwapIntent {
        sender: req.sender,
        route,
        direction: req.direction,
        amount: req.amount,
        slippage,
        two_hop_mode: req.two_hop_mode,
    };
    let bundle = compose_swap(&intent, state.fees()).map_err(swap_failure)?;
    let messages = bundle.encode().map_err(swap_failure)?;

    Ok(Json(ComposeResponse {
        route: RouteResponse::from(&intent.route),
        quote: bundle.quote,
        operation: bundle.operation,
        fee: bundle.fee,
        messages,
    }))
}
