//! Transaction fee policy
//!
//! Fees are an explicit value passed into every composition call. The gas
//! limit for an operation is `default_gas * multiplier`, and the fee amount
//! is that limit times the gas price, rounded up.

use serde::{Deserialize, Serialize};
use wasmswap_core::{ChainConfig, GasMultipliers};

use crate::{Coin, StdFee};

/// Kind of transaction being paid for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Swap,
    SwapWithAllowance,
    PassThroughSwap,
    AddLiquidity,
    RemoveLiquidity,
    Stake,
    Unstake,
    Claim,
}

/// Gas price, fee denom, and per-operation gas scaling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeePolicy {
    pub fee_denom: String,
    pub gas_price: f64,
    pub default_gas: u64,
    pub multipliers: GasMultipliers,
}

impl FeePolicy {
    pub fn new(chain: &ChainConfig, multipliers: GasMultipliers) -> Self {
        Self {
            fee_denom: chain.fee_denom.clone(),
            gas_price: chain.gas_price,
            default_gas: chain.default_gas,
            multipliers,
        }
    }

    fn multiplier(&self, op: Operation) -> f64 {
        let m = &self.multipliers;
        match op {
            Operation::Swap => m.swap,
            Operation::SwapWithAllowance => m.swap_with_allowance,
            Operation::PassThroughSwap => m.pass_through_swap,
            Operation::AddLiquidity => m.add_liquidity,
            Operation::RemoveLiquidity => m.remove_liquidity,
            Operation::Stake => m.stake,
            Operation::Unstake => m.unstake,
            Operation::Claim => m.claim,
        }
    }

    /// Gas limit for an operation
    pub fn gas_for(&self, op: Operation) -> u64 {
        (self.default_gas as f64 * self.multiplier(op)).ceil() as u64
    }

    /// Fee to attach to a transaction performing `op`
    pub fn fee_for(&self, op: Operation) -> StdFee {
        let gas = self.gas_for(op);
        let amount = (gas as f64 * self.gas_price).ceil() as u128;
        StdFee {
            amount: vec![Coin::new(amount, self.fee_denom.clone())],
            gas,
        }
    }
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self::new(&ChainConfig::default(), GasMultipliers::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gas_scaling_per_operation() {
        let policy = FeePolicy::default();
        assert_eq!(policy.gas_for(Operation::Swap), 400_000);
        assert_eq!(policy.gas_for(Operation::SwapWithAllowance), 480_000);
        assert_eq!(policy.gas_for(Operation::PassThroughSwap), 800_000);
        assert_eq!(policy.gas_for(Operation::Stake), 1_040_000);
    }

    #[test]
    fn test_fee_amount_rounds_up() {
        let policy = FeePolicy {
            fee_denom: "ujuno".into(),
            gas_price: 0.0025,
            default_gas: 333_333,
            multipliers: GasMultipliers::default(),
        };
        let fee = policy.fee_for(Operation::Swap);
        assert_eq!(fee.gas, 333_333);
        // 333_333 * 0.0025 = 833.3325
        assert_eq!(fee.amount[0].amount.u128(), 834);
        assert_eq!(fee.amount[0].denom, "ujuno");
    }
}
