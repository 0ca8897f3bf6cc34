//! LP Staking Protocol Implementation
//!
//! Queries and messages for the staking contracts that accept Wasmswap
//! LP tokens. Staking goes through the LP token's CW20 `send` hook;
//! unstaking starts an unbonding claim that `claim` later withdraws.

pub mod messages;
pub mod queries;
pub mod state;

pub use messages::{compose_claim, compose_stake, compose_unstake, stake_hook_msg};
pub use queries::{claims, position, staked_value, total_value, unstaking_duration};
pub use state::{Claim, Duration, Expiration, StakingBundle, StakingError, StakingPosition};
