//! Constant product liquidity pool
//!
//! A `LiquidityPool` custodies two token reserves, issues proportional
//! shares to liquidity providers and prices swaps on x·y=k with a fee kept
//! in the reserves. All pricing comes from `amm_model`; this crate owns the
//! state, the locking and the token settlement around it.

pub mod math;
pub mod pool;
pub mod state;

pub use pool::{LiquidityPool, SwapDirection};
pub use state::{PoolDetails, PoolHeader, PoolSnapshot, PoolState};
