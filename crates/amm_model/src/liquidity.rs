//! Liquidity share accounting
//!
//! Shares are minted against the geometric mean of the first deposit and
//! proportionally afterwards; withdrawals pay out the floored pro-rata slice
//! of both reserves.

use crate::wide;
use crate::AmmError;

/// Amounts accepted by the pool for a deposit and the shares they mint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deposit {
    pub amount0: u128,
    pub amount1: u128,
    pub shares: u128,
}

/// Rescale a token amount from `token_decimals` to `share_decimals` precision,
/// rounding down.
pub fn normalize_amount(amount: u128, token_decimals: u8, share_decimals: u8) -> Result<u128, AmmError> {
    if token_decimals >= share_decimals {
        let exp = u32::from(token_decimals - share_decimals);
        // 10^exp beyond u128 means every representable amount rounds to zero
        Ok(10u128.checked_pow(exp).map_or(0, |scale| amount / scale))
    } else {
        let exp = u32::from(share_decimals - token_decimals);
        let scale = 10u128.checked_pow(exp).ok_or(AmmError::Overflow)?;
        amount.checked_mul(scale).ok_or(AmmError::Overflow)
    }
}

/// Shares minted by the first deposit into an empty pool.
///
/// Both amounts are brought to share precision and the geometric mean
/// `floor(sqrt(n0 · n1))` is minted, so the initial share count does not
/// depend on which token the pair lists first.
pub fn bootstrap_shares(
    amount0: u128,
    amount1: u128,
    decimals0: u8,
    decimals1: u8,
    share_decimals: u8,
) -> Result<u128, AmmError> {
    if amount0 == 0 || amount1 == 0 {
        return Err(AmmError::ZeroAmount);
    }

    let n0 = normalize_amount(amount0, decimals0, share_decimals)?;
    let n1 = normalize_amount(amount1, decimals1, share_decimals)?;

    let shares = wide::sqrt_product(n0, n1);
    if shares == 0 {
        return Err(AmmError::InsufficientLiquidityMinted);
    }
    Ok(shares)
}

/// Shares minted for adding `(amount0, amount1)` to an active pool.
///
/// The smaller of the two pro-rata counts is used, so an off-ratio deposit
/// can never dilute existing holders.
pub fn shares_for_deposit(
    amount0: u128,
    amount1: u128,
    reserve0: u128,
    reserve1: u128,
    total_shares: u128,
) -> Result<u128, AmmError> {
    if reserve0 == 0 || reserve1 == 0 {
        return Err(AmmError::EmptyReserves);
    }
    let by0 = wide::mul_div(total_shares, amount0, reserve0)?;
    let by1 = wide::mul_div(total_shares, amount1, reserve1)?;
    Ok(by0.min(by1))
}

/// Largest deposit within `(amount0_desired, amount1_desired)` that keeps the
/// pool's reserve ratio, with the shares it mints.
///
/// # Returns
/// * `Deposit` with the amounts the pool pulls and the shares it mints
/// * `AmmError::ZeroAmount` if a desired amount is zero
/// * `AmmError::EmptyReserves` if the pool has no reserves or shares
/// * `AmmError::InsufficientLiquidityMinted` if the deposit rounds to nothing
pub fn optimal_deposit(
    amount0_desired: u128,
    amount1_desired: u128,
    reserve0: u128,
    reserve1: u128,
    total_shares: u128,
) -> Result<Deposit, AmmError> {
    if amount0_desired == 0 || amount1_desired == 0 {
        return Err(AmmError::ZeroAmount);
    }
    if reserve0 == 0 || reserve1 == 0 || total_shares == 0 {
        return Err(AmmError::EmptyReserves);
    }

    let amount1_optimal = wide::mul_div(amount0_desired, reserve1, reserve0)?;
    let (amount0, amount1) = if amount1_optimal <= amount1_desired {
        (amount0_desired, amount1_optimal)
    } else {
        // amount0_optimal < amount0_desired here
        let amount0_optimal = wide::mul_div(amount1_desired, reserve0, reserve1)?;
        (amount0_optimal, amount1_desired)
    };

    if amount0 == 0 || amount1 == 0 {
        return Err(AmmError::InsufficientLiquidityMinted);
    }

    let shares = shares_for_deposit(amount0, amount1, reserve0, reserve1, total_shares)?;
    if shares == 0 {
        return Err(AmmError::InsufficientLiquidityMinted);
    }

    Ok(Deposit { amount0, amount1, shares })
}

/// Token amounts paid out for redeeming `shares`, rounded down.
pub fn withdraw_amounts(
    shares: u128,
    reserve0: u128,
    reserve1: u128,
    total_shares: u128,
) -> Result<(u128, u128), AmmError> {
    if shares == 0 {
        return Err(AmmError::ZeroAmount);
    }
    if shares > total_shares {
        return Err(AmmError::InsufficientShares);
    }

    let amount0 = wide::mul_div(reserve0, shares, total_shares)?;
    let amount1 = wide::mul_div(reserve1, shares, total_shares)?;
    Ok((amount0, amount1))
}
