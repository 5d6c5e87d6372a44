//! AMM Model - Pure constant product math (x·y=k) for liquidity pools
//!
//! This crate contains the pricing and share-accounting formulas used by the
//! `pairswap-amm` pool, kept free of state so they can be checked with Kani
//! and property tests in isolation.
//!
//! All amounts are unsigned token units. Intermediate products are carried in
//! 256 bits, so any pair of `u128` reserves can be priced without overflow.
//! Every function rounds in the pool's favour: outputs and minted shares are
//! floored, never rounded up.

#![no_std]

pub mod liquidity;
pub mod math;
mod wide;

pub use liquidity::{
    bootstrap_shares, normalize_amount, optimal_deposit, shares_for_deposit, withdraw_amounts,
    Deposit,
};
pub use math::{quote_equivalent, quote_swap, SwapQuote};
pub use wide::{product, U256};

/// Default swap fee numerator (0.3% fee)
pub const DEFAULT_FEE_NUMERATOR: u128 = 997;

/// Default swap fee denominator
pub const DEFAULT_FEE_DENOMINATOR: u128 = 1000;

/// Default precision of LP shares (decimal places)
pub const DEFAULT_SHARE_DECIMALS: u8 = 6;

/// Error types for AMM operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmError {
    /// One of the reserves is zero
    EmptyReserves,
    /// Input amount is zero
    ZeroAmount,
    /// Fee fraction is not in (0, 1]
    InvalidFee,
    /// Deposit would mint no shares
    InsufficientLiquidityMinted,
    /// Withdrawal asks for more shares than exist
    InsufficientShares,
    /// Arithmetic overflow
    Overflow,
}

/// Fee retained by the pool on every swap, as the fraction of the input that
/// reaches the curve (`numerator / denominator`, e.g. 997/1000 for 0.3%).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fee {
    pub numerator: u128,
    pub denominator: u128,
}

impl Fee {
    pub const fn new(numerator: u128, denominator: u128) -> Self {
        Self { numerator, denominator }
    }

    /// No fee: the whole input reaches the curve
    pub const fn zero() -> Self {
        Self { numerator: 1, denominator: 1 }
    }

    /// True when the whole input reaches the curve
    pub const fn is_zero(&self) -> bool {
        self.numerator == self.denominator
    }

    pub fn validate(&self) -> Result<(), AmmError> {
        if self.denominator == 0 || self.numerator == 0 || self.numerator > self.denominator {
            return Err(AmmError::InvalidFee);
        }
        Ok(())
    }

    /// Input left after the fee is taken, rounded down
    pub fn apply(&self, amount_in: u128) -> Result<u128, AmmError> {
        self.validate()?;
        wide::mul_div(amount_in, self.numerator, self.denominator)
    }
}

impl Default for Fee {
    fn default() -> Self {
        Self::new(DEFAULT_FEE_NUMERATOR, DEFAULT_FEE_DENOMINATOR)
    }
}
