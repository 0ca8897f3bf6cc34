//! Wasmswap Calculator
//!
//! Constant product swap math (x * y = k) with the pool fee taken out of
//! the input. Every hop floors, exactly as the pool contract does, so a
//! local quote never promises more than execution can deliver.

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use wasmswap_core::Uint128;

use crate::constants::{bps::BPS_DENOM, liquidity::TOKEN2_ROUNDING_PAD};
use crate::state::{Fee, Hop, HopQuote, Pool, Quote, Route, Slippage, SwapDirection, SwapError};

fn to_u128(value: BigInt) -> Result<u128, SwapError> {
    value.to_u128().ok_or(SwapError::InsufficientLiquidity)
}

/// Calculate swap output using constant product formula
///
/// Formula: output = floor(reserve_out * input * fee_num / (reserve_in * fee_denom + input * fee_num))
pub fn calculate_output(
    reserve_in: u128,
    reserve_out: u128,
    input_amount: u128,
    fee: Fee,
) -> Result<u128, SwapError> {
    if input_amount == 0 {
        return Err(SwapError::ZeroAmount);
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(SwapError::InsufficientLiquidity);
    }

    let input_with_fee = BigInt::from(input_amount) * BigInt::from(fee.num);
    let numerator = &input_with_fee * BigInt::from(reserve_out);
    let denominator = BigInt::from(reserve_in) * BigInt::from(fee.denom) + input_with_fee;

    if denominator.is_zero() {
        return Err(SwapError::InsufficientLiquidity);
    }

    let output = to_u128(numerator / denominator)?;
    if output >= reserve_out {
        return Err(SwapError::InsufficientLiquidity);
    }
    Ok(output)
}

/// Smallest input whose floored output reaches `output_amount`
///
/// Formula: input = ceil(reserve_in * output * fee_denom / ((reserve_out - output) * fee_num))
pub fn calculate_input(
    reserve_in: u128,
    reserve_out: u128,
    output_amount: u128,
    fee: Fee,
) -> Result<u128, SwapError> {
    if output_amount == 0 {
        return Err(SwapError::ZeroAmount);
    }
    if reserve_in == 0 || reserve_out == 0 || output_amount >= reserve_out {
        return Err(SwapError::InsufficientLiquidity);
    }

    let numerator =
        BigInt::from(reserve_in) * BigInt::from(output_amount) * BigInt::from(fee.denom);
    let denominator = BigInt::from(reserve_out - output_amount) * BigInt::from(fee.num);

    if denominator.is_zero() {
        return Err(SwapError::InsufficientLiquidity);
    }

    let input = (numerator + &denominator - 1) / denominator;
    to_u128(input)
}

/// Calculate spot price (reserve_out / reserve_in)
pub fn calculate_spot_price(reserve_in: u128, reserve_out: u128) -> f64 {
    if reserve_in == 0 {
        return 0.0;
    }
    reserve_out as f64 / reserve_in as f64
}

/// Price impact as a percentage of the spot price
pub fn calculate_price_impact(spot_price: f64, input_amount: u128, output_amount: u128) -> f64 {
    if input_amount == 0 || output_amount == 0 || spot_price == 0.0 {
        return 0.0;
    }
    let execution_price = output_amount as f64 / input_amount as f64;
    ((spot_price - execution_price) / spot_price).abs() * 100.0
}

/// Calculate effective rate after fees
pub fn calculate_effective_rate(input_amount: u128, output_amount: u128) -> f64 {
    if input_amount == 0 {
        return 0.0;
    }
    output_amount as f64 / input_amount as f64
}

/// Portion of `input_amount` kept by the pool as fee
pub fn calculate_fee_amount(input_amount: u128, fee: Fee) -> u128 {
    if fee.denom == 0 {
        return 0;
    }
    let taken = BigInt::from(input_amount) * BigInt::from(fee.denom.saturating_sub(fee.num))
        / BigInt::from(fee.denom);
    taken.to_u128().unwrap_or(0)
}

fn hop_quote(hop: &Hop, amount_in: u128, amount_out: u128) -> HopQuote {
    let (reserve_in, reserve_out) = hop.pool.reserves(hop.direction);
    let spot = calculate_spot_price(reserve_in, reserve_out);
    HopQuote {
        pool: hop.pool.swap_address.clone(),
        token_in: hop.token_in().id().to_string(),
        token_out: hop.token_out().id().to_string(),
        amount_in: Uint128::new(amount_in),
        amount_out: Uint128::new(amount_out),
        fee_amount: Uint128::new(calculate_fee_amount(amount_in, hop.pool.fee)),
        reserve_in: Uint128::new(reserve_in),
        reserve_out: Uint128::new(reserve_out),
        price_impact: calculate_price_impact(spot, amount_in, amount_out),
    }
}

/// Price `amount` along `route`.
///
/// Exact-in walks the hops forward, feeding each floored output into the
/// next hop. Exact-out walks them backward, each hop asking for the
/// smallest input that produces the next hop's requirement. The returned
/// quote carries zero slippage; see [`Quote::with_slippage`].
pub fn quote(route: &Route, amount: Uint128, direction: SwapDirection) -> Result<Quote, SwapError> {
    let amount = amount.u128();
    if amount == 0 {
        return Err(SwapError::ZeroAmount);
    }

    if route.is_identity() {
        return Ok(Quote {
            direction,
            amount_in: Uint128::new(amount),
            amount_out: Uint128::new(amount),
            spot_price: 1.0,
            effective_rate: 1.0,
            price_impact: 0.0,
            slippage: Slippage::ZERO,
            limit: Uint128::new(amount),
            hops: Vec::new(),
        });
    }

    let hops = match direction {
        SwapDirection::ExactIn => {
            let mut hops = Vec::with_capacity(route.hops.len());
            let mut next_in = amount;
            for hop in &route.hops {
                // A positive amount floored away by an earlier hop
                if next_in == 0 {
                    return Err(SwapError::InsufficientLiquidity);
                }
                let (reserve_in, reserve_out) = hop.pool.reserves(hop.direction);
                let out = calculate_output(reserve_in, reserve_out, next_in, hop.pool.fee)?;
                hops.push(hop_quote(hop, next_in, out));
                next_in = out;
            }
            hops
        }
        SwapDirection::ExactOut => {
            let mut hops = Vec::with_capacity(route.hops.len());
            let mut needed_out = amount;
            for hop in route.hops.iter().rev() {
                let (reserve_in, reserve_out) = hop.pool.reserves(hop.direction);
                let input = calculate_input(reserve_in, reserve_out, needed_out, hop.pool.fee)?;
                hops.push(hop_quote(hop, input, needed_out));
                needed_out = input;
            }
            hops.reverse();
            hops
        }
    };

    let amount_in = hops.first().map(|h| h.amount_in.u128()).unwrap_or(amount);
    let amount_out = hops.last().map(|h| h.amount_out.u128()).unwrap_or(amount);
    let spot_price: f64 = route
        .hops
        .iter()
        .map(|hop| {
            let (reserve_in, reserve_out) = hop.pool.reserves(hop.direction);
            calculate_spot_price(reserve_in, reserve_out)
        })
        .product();

    Ok(Quote {
        direction,
        amount_in: Uint128::new(amount_in),
        amount_out: Uint128::new(amount_out),
        spot_price,
        effective_rate: calculate_effective_rate(amount_in, amount_out),
        price_impact: calculate_price_impact(spot_price, amount_in, amount_out),
        slippage: Slippage::ZERO,
        limit: Uint128::new(match direction {
            SwapDirection::ExactIn => amount_out,
            SwapDirection::ExactOut => amount_in,
        }),
        hops,
    })
}

/// floor(amount_out * (1 - s))
pub fn minimum_output_for(quote: &Quote, slippage: Slippage) -> Uint128 {
    let scaled = BigInt::from(quote.amount_out.u128()) * BigInt::from(BPS_DENOM - slippage.bps())
        / BigInt::from(BPS_DENOM);
    Uint128::new(scaled.to_u128().unwrap_or(0))
}

/// ceil(amount_in * (1 + s))
pub fn maximum_input_for(quote: &Quote, slippage: Slippage) -> Uint128 {
    let denom = BigInt::from(BPS_DENOM);
    let scaled: BigInt = (BigInt::from(quote.amount_in.u128())
        * BigInt::from(BPS_DENOM + slippage.bps())
        + &denom
        - BigInt::from(1u8))
        / denom;
    Uint128::new(scaled.to_u128().unwrap_or(u128::MAX))
}

impl Quote {
    /// Set the slippage tolerance and recompute the execution bound
    pub fn with_slippage(mut self, slippage: Slippage) -> Self {
        self.limit = match self.direction {
            SwapDirection::ExactIn => minimum_output_for(&self, slippage),
            SwapDirection::ExactOut => maximum_input_for(&self, slippage),
        };
        self.slippage = slippage;
        self
    }
}

/// Tokens returned for burning `lp_amount` LP tokens: (token1, token2)
///
/// token_i = floor(lp_amount * reserve_i / lp_supply)
pub fn calculate_redeem_shares(pool: &Pool, lp_amount: u128) -> Result<(u128, u128), SwapError> {
    if lp_amount == 0 {
        return Err(SwapError::ZeroAmount);
    }
    let supply = pool.lp_token_supply.u128();
    if supply == 0 || lp_amount > supply {
        return Err(SwapError::InsufficientLiquidity);
    }
    let token1 = BigInt::from(lp_amount) * BigInt::from(pool.token1_reserve.u128())
        / BigInt::from(supply);
    let token2 = BigInt::from(lp_amount) * BigInt::from(pool.token2_reserve.u128())
        / BigInt::from(supply);
    Ok((to_u128(token1)?, to_u128(token2)?))
}

/// Token2 the pool takes alongside `token1_amount` on deposit
///
/// token2 = floor(token1 * reserve2 / reserve1) + 1
pub fn calculate_deposit_token2_needed(
    pool: &Pool,
    token1_amount: u128,
) -> Result<u128, SwapError> {
    if token1_amount == 0 {
        return Err(SwapError::ZeroAmount);
    }
    let reserve1 = pool.token1_reserve.u128();
    if reserve1 == 0 {
        return Err(SwapError::InsufficientLiquidity);
    }
    let proportional = BigInt::from(token1_amount) * BigInt::from(pool.token2_reserve.u128())
        / BigInt::from(reserve1);
    Ok(to_u128(proportional)? + TOKEN2_ROUNDING_PAD)
}

/// LP tokens minted for a deposit of `token1_amount`
///
/// lp = floor(token1 * lp_supply / reserve1)
pub fn calculate_lp_reward(pool: &Pool, token1_amount: u128) -> Result<u128, SwapError> {
    let reserve1 = pool.token1_reserve.u128();
    if reserve1 == 0 {
        return Err(SwapError::InsufficientLiquidity);
    }
    let reward = BigInt::from(token1_amount) * BigInt::from(pool.lp_token_supply.u128())
        / BigInt::from(reserve1);
    to_u128(reward)
}
