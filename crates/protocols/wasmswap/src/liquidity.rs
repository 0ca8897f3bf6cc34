//! Liquidity add/remove composition
//!
//! Remove: allowance on the LP token for the pool, then `remove_liquidity`
//! with zero minimums. Add: allowances for CW20 sides, native sides as
//! funds, then `add_liquidity`.

use serde::{Deserialize, Serialize};
use wasm_client::{Coin, ExecuteContract, FeePolicy, Operation, StdFee};
use wasmswap_core::{Address, Uint128};

use crate::calculator::{
    calculate_deposit_token2_needed, calculate_lp_reward, calculate_redeem_shares,
};
use crate::constants::liquidity::REMOVE_MIN_TOKEN;
use crate::msg::{encode_all, ExecuteMsg, OrderedMessage};
use crate::state::{Pool, Slippage, SwapError, Token, TokenFunding};

/// Expected result of burning LP tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemPreview {
    pub lp_amount: Uint128,
    pub token1_amount: Uint128,
    pub token2_amount: Uint128,
}

/// Expected cost and reward of a deposit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositPreview {
    pub token1_amount: Uint128,
    pub token2_amount: Uint128,
    pub lp_amount: Uint128,
}

/// Composed, unsigned liquidity transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityBundle {
    pub sender: Address,
    pub messages: Vec<OrderedMessage>,
    pub operation: Operation,
    pub fee: StdFee,
}

impl LiquidityBundle {
    pub fn encode(&self) -> Result<Vec<ExecuteContract>, SwapError> {
        encode_all(&self.messages, &self.sender)
    }
}

/// Share of each reserve returned for `lp_amount`
pub fn preview_remove_liquidity(
    pool: &Pool,
    lp_amount: Uint128,
) -> Result<RedeemPreview, SwapError> {
    let (token1, token2) = calculate_redeem_shares(pool, lp_amount.u128())?;
    Ok(RedeemPreview {
        lp_amount,
        token1_amount: Uint128::new(token1),
        token2_amount: Uint128::new(token2),
    })
}

/// Token2 taken alongside `token1_amount` and LP minted for it
pub fn preview_add_liquidity(
    pool: &Pool,
    token1_amount: Uint128,
) -> Result<DepositPreview, SwapError> {
    let token2 = calculate_deposit_token2_needed(pool, token1_amount.u128())?;
    let lp = calculate_lp_reward(pool, token1_amount.u128())?;
    Ok(DepositPreview {
        token1_amount,
        token2_amount: Uint128::new(token2),
        lp_amount: Uint128::new(lp),
    })
}

pub fn compose_remove_liquidity(
    sender: &Address,
    pool: &Pool,
    lp_amount: Uint128,
    fees: &FeePolicy,
) -> Result<LiquidityBundle, SwapError> {
    if lp_amount.is_zero() {
        return Err(SwapError::ZeroAmount);
    }

    let messages = vec![
        OrderedMessage::increase_allowance(&pool.lp_token_address, &pool.swap_address, lp_amount),
        OrderedMessage::new(
            pool.swap_address.clone(),
            ExecuteMsg::RemoveLiquidity {
                amount: lp_amount,
                min_token1: Uint128::new(REMOVE_MIN_TOKEN),
                min_token2: Uint128::new(REMOVE_MIN_TOKEN),
            },
        ),
    ];

    tracing::info!(pool = %pool.swap_address, %sender, %lp_amount, "Composed remove liquidity");

    Ok(LiquidityBundle {
        sender: sender.clone(),
        messages,
        operation: Operation::RemoveLiquidity,
        fee: fees.fee_for(Operation::RemoveLiquidity),
    })
}

fn fund_side(
    messages: &mut Vec<OrderedMessage>,
    funds: &mut Vec<Coin>,
    token: &Token,
    pool: &Pool,
    amount: Uint128,
) {
    match token.funding() {
        TokenFunding::Native { denom } => funds.push(Coin::new(amount, denom)),
        TokenFunding::Contract { token_address } => messages.push(
            OrderedMessage::increase_allowance(&token_address, &pool.swap_address, amount),
        ),
    }
}

/// Deposit `token1_amount` plus the proportional token2.
///
/// `slippage` lowers `min_liquidity` below the previewed LP amount and
/// raises `max_token2` above the previewed token2 amount.
pub fn compose_add_liquidity(
    sender: &Address,
    pool: &Pool,
    token1_amount: Uint128,
    slippage: Slippage,
    fees: &FeePolicy,
) -> Result<(DepositPreview, LiquidityBundle), SwapError> {
    let preview = preview_add_liquidity(pool, token1_amount)?;

    let bps = slippage.bps() as u128;
    let scale = Slippage::BPS_SCALE as u128;
    let min_liquidity = preview.lp_amount.u128().saturating_mul(scale - bps) / scale;
    let max_token2 = preview.token2_amount.u128().saturating_mul(scale + bps).div_ceil(scale);
    let max_token2 = Uint128::new(max_token2);

    let mut messages = Vec::with_capacity(3);
    let mut funds = Vec::new();
    fund_side(&mut messages, &mut funds, &pool.token1, pool, token1_amount);
    fund_side(&mut messages, &mut funds, &pool.token2, pool, max_token2);

    messages.push(
        OrderedMessage::new(
            pool.swap_address.clone(),
            ExecuteMsg::AddLiquidity {
                token1_amount,
                min_liquidity: Uint128::new(min_liquidity),
                max_token2,
            },
        )
        .with_funds(funds),
    );

    tracing::info!(
        pool = %pool.swap_address,
        %sender,
        %token1_amount,
        %max_token2,
        "Composed add liquidity"
    );

    Ok((
        preview,
        LiquidityBundle {
            sender: sender.clone(),
            messages,
            operation: Operation::AddLiquidity,
            fee: fees.fee_for(Operation::AddLiquidity),
        },
    ))
}
