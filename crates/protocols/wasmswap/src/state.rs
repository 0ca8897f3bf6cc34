//! Wasmswap State Types
//!
//! Tokens, pools, routes, quotes, and swap intents.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasmswap_core::{Address, BlockHeight, ChainError, TxHash, Uint128};

use crate::constants::fees;
use crate::msg::TokenSelect;

/// How a token exists on chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenKind {
    /// Bank module coin, moved by attaching funds
    Native { denom: String },
    /// CW20 contract token, moved by allowance + transfer-from
    Cw20 { address: Address },
}

/// Token metadata, resolved by the caller before anything reaches the core
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub decimals: u8,
    #[serde(flatten)]
    pub kind: TokenKind,
}

impl Token {
    pub fn native(symbol: impl Into<String>, denom: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
            kind: TokenKind::Native {
                denom: denom.into(),
            },
        }
    }

    pub fn cw20(symbol: impl Into<String>, address: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
            kind: TokenKind::Cw20 {
                address: Address::new(address),
            },
        }
    }

    /// Chain identity: the denom for native tokens, the contract address otherwise
    pub fn id(&self) -> &str {
        match &self.kind {
            TokenKind::Native { denom } => denom,
            TokenKind::Cw20 { address } => address.as_str(),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self.kind, TokenKind::Native { .. })
    }

    /// How a sender pays this token into a contract
    pub fn funding(&self) -> TokenFunding {
        match &self.kind {
            TokenKind::Native { denom } => TokenFunding::Native {
                denom: denom.clone(),
            },
            TokenKind::Cw20 { address } => TokenFunding::Contract {
                token_address: address.clone(),
            },
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.id())
    }
}

/// Funding capability for one hop's input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenFunding {
    /// Attach `denom` coins to the execute message
    Native { denom: String },
    /// Grant the pool an allowance on `token_address` first
    Contract { token_address: Address },
}

/// Pool swap fee as a retained fraction (997/1000 keeps 99.7% of the input)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fee {
    pub num: u32,
    pub denom: u32,
}

impl Fee {
    pub fn new(num: u32, denom: u32) -> Self {
        Self { num, denom }
    }

    /// Fee taken as a percentage of the input
    pub fn percent(&self) -> f64 {
        if self.denom == 0 {
            return 0.0;
        }
        (1.0 - self.num as f64 / self.denom as f64) * 100.0
    }
}

impl Default for Fee {
    fn default() -> Self {
        Self::new(fees::DEFAULT_FEE_NUM, fees::DEFAULT_FEE_DENOM)
    }
}

/// Wasmswap pool state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    /// Pool (swap) contract address
    pub swap_address: Address,
    pub token1: Token,
    pub token2: Token,
    pub token1_reserve: Uint128,
    pub token2_reserve: Uint128,
    /// LP token contract
    pub lp_token_address: Address,
    /// Circulating LP supply
    pub lp_token_supply: Uint128,
    #[serde(default)]
    pub fee: Fee,
}

impl Pool {
    /// Whether `token_id` is one side of this pool
    pub fn contains(&self, token_id: &str) -> bool {
        self.token1.id() == token_id || self.token2.id() == token_id
    }

    /// Direction of a hop that spends `token_in`
    pub fn direction_from(&self, token_in: &str) -> Option<HopDirection> {
        if self.token1.id() == token_in {
            Some(HopDirection::Token1ToToken2)
        } else if self.token2.id() == token_in {
            Some(HopDirection::Token2ToToken1)
        } else {
            None
        }
    }

    /// (input reserve, output reserve) for a hop direction
    pub fn reserves(&self, direction: HopDirection) -> (u128, u128) {
        match direction {
            HopDirection::Token1ToToken2 => {
                (self.token1_reserve.u128(), self.token2_reserve.u128())
            }
            HopDirection::Token2ToToken1 => {
                (self.token2_reserve.u128(), self.token1_reserve.u128())
            }
        }
    }

    /// (input token, output token) for a hop direction
    pub fn tokens(&self, direction: HopDirection) -> (&Token, &Token) {
        match direction {
            HopDirection::Token1ToToken2 => (&self.token1, &self.token2),
            HopDirection::Token2ToToken1 => (&self.token2, &self.token1),
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pool {} | {}: {} | {}: {}",
            self.swap_address,
            self.token1.symbol,
            self.token1_reserve,
            self.token2.symbol,
            self.token2_reserve
        )
    }
}

/// Which side of a pool a hop sells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HopDirection {
    Token1ToToken2,
    Token2ToToken1,
}

impl HopDirection {
    /// The `input_token` selector the pool contract expects
    pub fn input_select(self) -> TokenSelect {
        match self {
            Self::Token1ToToken2 => TokenSelect::Token1,
            Self::Token2ToToken1 => TokenSelect::Token2,
        }
    }
}

/// One pool traversal in a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hop {
    pub pool: Pool,
    pub direction: HopDirection,
}

impl Hop {
    pub fn token_in(&self) -> &Token {
        self.pool.tokens(self.direction).0
    }

    pub fn token_out(&self) -> &Token {
        self.pool.tokens(self.direction).1
    }
}

/// Ordered path from `from` to `to`.
///
/// Zero hops is the identity route (same token), one hop is a direct pool,
/// two hops pass through the base token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub from: Token,
    pub to: Token,
    pub hops: Vec<Hop>,
}

impl Route {
    pub fn identity(token: Token) -> Self {
        Self {
            from: token.clone(),
            to: token,
            hops: Vec::new(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.from.symbol)?;
        for hop in &self.hops {
            write!(f, " -> {}", hop.token_out().symbol)?;
        }
        Ok(())
    }
}

/// Which side of the trade the caller fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDirection {
    ExactIn,
    ExactOut,
}

/// Slippage tolerance in basis points, `0..=9_999`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct Slippage(u32);

impl TryFrom<u32> for Slippage {
    type Error = SwapError;

    fn try_from(bps: u32) -> Result<Self, Self::Error> {
        Self::from_bps(bps)
    }
}

impl From<Slippage> for u32 {
    fn from(slippage: Slippage) -> Self {
        slippage.0
    }
}

impl Slippage {
    pub const ZERO: Self = Self(0);
    pub const BPS_SCALE: u32 = 10_000;

    pub fn from_bps(bps: u32) -> Result<Self, SwapError> {
        if bps >= Self::BPS_SCALE {
            return Err(SwapError::InvalidSlippage(bps as f64 / Self::BPS_SCALE as f64));
        }
        Ok(Self(bps))
    }

    /// From a fraction in `[0, 1)`, rounded to the nearest basis point
    pub fn from_fraction(fraction: f64) -> Result<Self, SwapError> {
        if !(0.0..1.0).contains(&fraction) {
            return Err(SwapError::InvalidSlippage(fraction));
        }
        Self::from_bps((fraction * Self::BPS_SCALE as f64).round() as u32)
    }

    pub fn bps(self) -> u32 {
        self.0
    }

    pub fn as_fraction(self) -> f64 {
        self.0 as f64 / Self::BPS_SCALE as f64
    }
}

/// Per-hop breakdown of a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HopQuote {
    pub pool: Address,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: Uint128,
    pub amount_out: Uint128,
    pub fee_amount: Uint128,
    pub reserve_in: Uint128,
    pub reserve_out: Uint128,
    pub price_impact: f64,
}

/// Priced route. Derived from one registry snapshot and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub direction: SwapDirection,
    pub amount_in: Uint128,
    pub amount_out: Uint128,
    /// Reserve-ratio price of `to` per `from`, before fees and impact
    pub spot_price: f64,
    pub effective_rate: f64,
    /// End-to-end price impact percentage
    pub price_impact: f64,
    pub slippage: Slippage,
    /// Minimum output (exact-in) or maximum input (exact-out) at `slippage`
    pub limit: Uint128,
    pub hops: Vec<HopQuote>,
}

/// How two-hop routes are expressed as messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwoHopMode {
    /// One `pass_through_swap` on the first pool naming the second pool
    #[default]
    PassThrough,
    /// A `swap` on each pool, hop 2 spending hop 1's quoted output
    Sequential,
}

/// Everything needed to compose one swap transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapIntent {
    pub sender: Address,
    pub route: Route,
    pub direction: SwapDirection,
    /// Input amount (exact-in) or desired output amount (exact-out)
    pub amount: Uint128,
    pub slippage: Slippage,
    #[serde(default)]
    pub two_hop_mode: TwoHopMode,
}

/// Successful inclusion of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResult {
    pub tx_hash: TxHash,
    pub height: BlockHeight,
    pub code: u32,
    pub raw_log: String,
    pub gas_used: u64,
}

/// Wasmswap protocol errors
#[derive(Debug, Error)]
pub enum SwapError {
    #[error("No route from {from} to {to}")]
    NoRoute { from: String, to: String },

    #[error("Swap amount must be greater than zero")]
    ZeroAmount,

    #[error("Insufficient liquidity for swap")]
    InsufficientLiquidity,

    #[error("Pool not found: {0}")]
    PoolNotFound(String),

    #[error("Invalid token for pool: {0}")]
    InvalidToken(String),

    #[error("Slippage tolerance must be in [0, 1), got {0}")]
    InvalidSlippage(f64),

    #[error(
        "Error when broadcasting tx {tx_hash} at height {height}. Code: {code}; Raw log: {raw_log}"
    )]
    ExecutionFailed {
        code: u32,
        raw_log: String,
        tx_hash: TxHash,
        height: BlockHeight,
    },

    #[error("Broadcast outcome unknown{}", tx_hash.as_ref().map(|h| format!(" for tx {}", h)).unwrap_or_default())]
    TimeoutOrUnknown { tx_hash: Option<TxHash> },

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Transaction build failed: {0}")]
    TxBuild(String),
}

impl SwapError {
    /// The transaction may or may not have been included
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Self::TimeoutOrUnknown { .. })
    }

    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoRoute { .. } => "no_route",
            Self::ZeroAmount => "zero_amount",
            Self::InsufficientLiquidity => "insufficient_liquidity",
            Self::PoolNotFound(_) => "pool_not_found",
            Self::InvalidToken(_) => "invalid_token",
            Self::InvalidSlippage(_) => "invalid_slippage",
            Self::ExecutionFailed { .. } => "execution_failed",
            Self::TimeoutOrUnknown { .. } => "timeout_or_unknown",
            Self::Chain(_) => "chain_error",
            Self::TxBuild(_) => "tx_build_failed",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ZeroAmount | Self::InvalidSlippage(_) | Self::InvalidToken(_) => 400,
            Self::NoRoute { .. } | Self::PoolNotFound(_) => 404,
            Self::InsufficientLiquidity | Self::TxBuild(_) => 422,
            Self::ExecutionFailed { .. } => 502,
            Self::Chain(_) => 503,
            Self::TimeoutOrUnknown { .. } => 504,
        }
    }
}
