//! Wasmswap Protocol Implementation
//!
//! Routing, pricing, and transaction composition for Wasmswap pools,
//! where every pool pairs a token against the chain's base token.
//!
//! Data flows registry -> router -> calculator -> composer -> execution.
//! Everything up to the composer is pure and works on one registry
//! snapshot.

pub mod calculator;
pub mod composer;
pub mod constants;
pub mod execution;
pub mod fetch;
pub mod liquidity;
pub mod msg;
pub mod registry;
pub mod router;
pub mod state;

// Re-exports
pub use calculator::{
    calculate_input, calculate_output, maximum_input_for, minimum_output_for, quote,
};
pub use composer::{compose, compose_swap, operation_for, quote_intent, SwapBundle};
pub use constants::fees;
pub use execution::{classify, ExecutionClient};
pub use fetch::{discover_pools, fetch_pool, load_listings, refresh_registry, PoolListing};
pub use liquidity::{
    compose_add_liquidity, compose_remove_liquidity, preview_add_liquidity,
    preview_remove_liquidity, DepositPreview, LiquidityBundle, RedeemPreview,
};
pub use msg::{
    Cw20ExecuteMsg, ExecuteMsg, InfoResponse, OrderedMessage, QueryMsg, StakingExecuteMsg,
    TokenSelect, WasmMsg,
};
pub use registry::{PoolRegistry, SharedRegistry};
pub use router::{resolve_route, resolve_route_by_id};
pub use state::{
    Fee, Hop, HopDirection, HopQuote, Pool, Quote, Route, Slippage, SwapDirection, SwapError,
    SwapIntent, Token, TokenFunding, TokenKind, TwoHopMode, TxResult,
};
