//! Pool parameters

use crate::{DexError, Result};
use amm_model::{Fee, DEFAULT_FEE_DENOMINATOR, DEFAULT_FEE_NUMERATOR, DEFAULT_SHARE_DECIMALS};
use serde::{Deserialize, Serialize};

/// Largest share precision accepted; 10^38 is the largest power of ten in u128
pub const MAX_SHARE_DECIMALS: u8 = 38;

/// Parameters every pool created by a registry is built with.
///
/// Defaults to a 0.3% fee (997/1000 of the input reaches the curve) and
/// 6-decimal shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Part of the swap input that reaches the curve
    pub fee_numerator: u64,
    pub fee_denominator: u64,
    /// Decimal places of LP shares
    pub share_decimals: u8,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            fee_numerator: DEFAULT_FEE_NUMERATOR as u64,
            fee_denominator: DEFAULT_FEE_DENOMINATOR as u64,
            share_decimals: DEFAULT_SHARE_DECIMALS,
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<()> {
        self.fee().validate().map_err(DexError::from)?;
        if self.share_decimals > MAX_SHARE_DECIMALS {
            return Err(DexError::InvalidConfig(format!(
                "share_decimals must be at most {}, got {}",
                MAX_SHARE_DECIMALS, self.share_decimals
            )));
        }
        Ok(())
    }

    pub fn fee(&self) -> Fee {
        Fee::new(u128::from(self.fee_numerator), u128::from(self.fee_denominator))
    }

    /// Fee charged on input, in basis points (rounded down)
    pub fn fee_bps(&self) -> u64 {
        if self.fee_denominator == 0 {
            return 0;
        }
        (self.fee_denominator.saturating_sub(self.fee_numerator)) * 10_000 / self.fee_denominator
    }
}
