//! wasmswap-api: HTTP API layer for wasmswap
//!
//! Exposes pools, routes, quotes, and composed (unsigned) transactions.
//! Signing and broadcasting stay with the wallet.

pub mod dto;
pub mod routes;
pub mod server;
pub mod state;

pub use server::*;
pub use state::AppState;
