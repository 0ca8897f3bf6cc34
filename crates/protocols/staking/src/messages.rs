//! Stake / unstake / claim composition

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;
use wasm_client::{FeePolicy, Operation};
use wasmswap::{Cw20ExecuteMsg, OrderedMessage, StakingExecuteMsg};
use wasmswap_core::{Address, Uint128};

use crate::state::{StakingBundle, StakingError};

/// Base64 of the receive-hook payload `{"stake":{}}`
pub fn stake_hook_msg() -> String {
    STANDARD.encode(json!({ "stake": {} }).to_string())
}

fn bundle(
    sender: &Address,
    message: OrderedMessage,
    operation: Operation,
    fees: &FeePolicy,
) -> StakingBundle {
    tracing::info!(
        %sender,
        contract = %message.contract,
        op = ?operation,
        "Composed staking message"
    );
    StakingBundle {
        sender: sender.clone(),
        messages: vec![message],
        operation,
        fee: fees.fee_for(operation),
    }
}

/// Send `amount` LP tokens to the staking contract through the CW20 receive hook
pub fn compose_stake(
    sender: &Address,
    lp_token: &Address,
    staking_contract: &Address,
    amount: Uint128,
    fees: &FeePolicy,
) -> Result<StakingBundle, StakingError> {
    if amount.is_zero() {
        return Err(StakingError::ZeroAmount);
    }
    let message = OrderedMessage::new(
        lp_token.clone(),
        Cw20ExecuteMsg::Send {
            contract: staking_contract.clone(),
            amount,
            msg: stake_hook_msg(),
        },
    );
    Ok(bundle(sender, message, Operation::Stake, fees))
}

pub fn compose_unstake(
    sender: &Address,
    staking_contract: &Address,
    amount: Uint128,
    fees: &FeePolicy,
) -> Result<StakingBundle, StakingError> {
    if amount.is_zero() {
        return Err(StakingError::ZeroAmount);
    }
    let message =
        OrderedMessage::new(staking_contract.clone(), StakingExecuteMsg::Unstake { amount });
    Ok(bundle(sender, message, Operation::Unstake, fees))
}

/// Withdraw all matured claims
pub fn compose_claim(
    sender: &Address,
    staking_contract: &Address,
    fees: &FeePolicy,
) -> StakingBundle {
    let message = OrderedMessage::new(staking_contract.clone(), StakingExecuteMsg::Claim {});
    bundle(sender, message, Operation::Claim, fees)
}
