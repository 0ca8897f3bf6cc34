//! Contract message schemas
//!
//! Every payload sent to a pool, CW20 token, or staking contract is a
//! variant here. JSON is produced only when a message is encoded for the
//! signer.

use serde::{Deserialize, Serialize};
use wasm_client::{Coin, ExecuteContract};
use wasmswap_core::{Address, Uint128};

use crate::state::SwapError;

/// Which side of the pool is being sold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenSelect {
    Token1,
    Token2,
}

/// Pool contract execute messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    Swap {
        input_token: TokenSelect,
        input_amount: Uint128,
        min_output: Uint128,
    },
    PassThroughSwap {
        output_amm_address: Address,
        input_token: TokenSelect,
        input_token_amount: Uint128,
        output_min_token: Uint128,
    },
    AddLiquidity {
        token1_amount: Uint128,
        min_liquidity: Uint128,
        max_token2: Uint128,
    },
    RemoveLiquidity {
        amount: Uint128,
        min_token1: Uint128,
        min_token2: Uint128,
    },
}

/// CW20 token contract execute messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cw20ExecuteMsg {
    IncreaseAllowance { amount: Uint128, spender: Address },
    /// Transfer to a contract and invoke its receive hook with base64 `msg`
    Send {
        contract: Address,
        amount: Uint128,
        msg: String,
    },
}

/// LP staking contract execute messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakingExecuteMsg {
    Unstake { amount: Uint128 },
    Claim {},
}

/// Pool contract queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    Info {},
}

/// Token reference as the pool contract reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Denom {
    Native(String),
    Cw20(Address),
}

impl Denom {
    pub fn id(&self) -> &str {
        match self {
            Denom::Native(denom) => denom,
            Denom::Cw20(address) => address.as_str(),
        }
    }
}

/// Response to `{"info":{}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoResponse {
    pub token1_reserve: Uint128,
    pub token1_denom: Denom,
    pub token2_reserve: Uint128,
    pub token2_denom: Denom,
    pub lp_token_supply: Uint128,
    pub lp_token_address: Address,
}

/// Any execute payload this crate produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WasmMsg {
    Pool(ExecuteMsg),
    Cw20(Cw20ExecuteMsg),
    Staking(StakingExecuteMsg),
}

impl WasmMsg {
    /// Message kind as it appears on the wire (`"swap"`, `"increase_allowance"`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            WasmMsg::Pool(ExecuteMsg::Swap { .. }) => "swap",
            WasmMsg::Pool(ExecuteMsg::PassThroughSwap { .. }) => "pass_through_swap",
            WasmMsg::Pool(ExecuteMsg::AddLiquidity { .. }) => "add_liquidity",
            WasmMsg::Pool(ExecuteMsg::RemoveLiquidity { .. }) => "remove_liquidity",
            WasmMsg::Cw20(Cw20ExecuteMsg::IncreaseAllowance { .. }) => "increase_allowance",
            WasmMsg::Cw20(Cw20ExecuteMsg::Send { .. }) => "send",
            WasmMsg::Staking(StakingExecuteMsg::Unstake { .. }) => "unstake",
            WasmMsg::Staking(StakingExecuteMsg::Claim {}) => "claim",
        }
    }
}

impl From<ExecuteMsg> for WasmMsg {
    fn from(msg: ExecuteMsg) -> Self {
        WasmMsg::Pool(msg)
    }
}

impl From<Cw20ExecuteMsg> for WasmMsg {
    fn from(msg: Cw20ExecuteMsg) -> Self {
        WasmMsg::Cw20(msg)
    }
}

impl From<StakingExecuteMsg> for WasmMsg {
    fn from(msg: StakingExecuteMsg) -> Self {
        WasmMsg::Staking(msg)
    }
}

/// One execute call in a bundle. Bundle order is execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedMessage {
    pub contract: Address,
    pub msg: WasmMsg,
    #[serde(default)]
    pub funds: Vec<Coin>,
}

impl OrderedMessage {
    pub fn new(contract: Address, msg: impl Into<WasmMsg>) -> Self {
        Self {
            contract,
            msg: msg.into(),
            funds: Vec::new(),
        }
    }

    pub fn with_funds(mut self, funds: Vec<Coin>) -> Self {
        self.funds = funds;
        self
    }

    pub fn name(&self) -> &'static str {
        self.msg.name()
    }

    /// `increase_allowance` on `token` letting `spender` pull `amount`
    pub fn increase_allowance(token: &Address, spender: &Address, amount: Uint128) -> Self {
        Self::new(
            token.clone(),
            Cw20ExecuteMsg::IncreaseAllowance {
                amount,
                spender: spender.clone(),
            },
        )
    }

    /// Serialize into the signer-facing execute message
    pub fn encode(&self, sender: &Address) -> Result<ExecuteContract, SwapError> {
        let msg = serde_json::to_value(&self.msg)
            .map_err(|e| SwapError::TxBuild(format!("Failed to encode {}: {}", self.name(), e)))?;
        Ok(ExecuteContract {
            sender: sender.clone(),
            contract: self.contract.clone(),
            msg,
            funds: self.funds.clone(),
        })
    }
}

/// Encode a whole bundle, preserving order
pub fn encode_all(
    messages: &[OrderedMessage],
    sender: &Address,
) -> Result<Vec<ExecuteContract>, SwapError> {
    messages.iter().map(|m| m.encode(sender)).collect()
}
