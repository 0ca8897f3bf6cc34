//! Wasmswap Constants
//!
//! Fee parameters and fixed contract payloads.

/// Fee constants
pub mod fees {
    /// Default fee numerator (0.3% fee = 997/1000)
    pub const DEFAULT_FEE_NUM: u32 = 997;

    /// Default fee denominator
    pub const DEFAULT_FEE_DENOM: u32 = 1000;
}

/// Slippage scale
pub mod bps {
    /// One whole in basis points
    pub const BPS_DENOM: u32 = 10_000;
}

/// Liquidity bounds sent with remove/add liquidity
pub mod liquidity {
    /// `min_token1` / `min_token2` sent with `remove_liquidity`
    pub const REMOVE_MIN_TOKEN: u128 = 0;

    /// Added to the proportional token2 amount, matching the pool's own rounding
    pub const TOKEN2_ROUNDING_PAD: u128 = 1;
}
