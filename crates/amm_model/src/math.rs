//! Constant product swap math (x·y=k)

use crate::wide::{self, U256};
use crate::{AmmError, Fee};

/// Priced swap against a pair of reserves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// Full input paid by the trader (the fee stays in the pool)
    pub amount_in: u128,

    /// Input that reaches the curve after the fee
    pub amount_in_after_fee: u128,

    /// Output paid to the trader (may be zero for dust inputs)
    pub amount_out: u128,

    /// Input-side reserve after the trade
    pub new_reserve_in: u128,

    /// Output-side reserve after the trade
    pub new_reserve_out: u128,
}

/// Quote a swap of `amount_in` against `(reserve_in, reserve_out)`.
///
/// With fee on input:
/// - Δin_net = floor(Δin · num / den)
/// - y1 = floor(x0·y0 / (x0 + Δin_net))
/// - Δout = y0 - y1
///
/// The retained output reserve is additionally kept strictly above the
/// fee-less curve through `x0 + Δin`, so that `(x0 + Δin) · y1 > x0 · y0`
/// holds for every accepted trade even where flooring `y1` would otherwise
/// hand the rounding remainder to the trader. Without a fee the bound is
/// `ceil(x0·y0 / (x0 + Δin))` instead: x·y may stay flat but never drops.
///
/// # Arguments
/// * `reserve_in` - Reserve of the token being sold to the pool
/// * `reserve_out` - Reserve of the token being bought from the pool
/// * `amount_in` - Amount sold to the pool
/// * `fee` - Fraction of the input that reaches the curve
///
/// # Returns
/// * `SwapQuote` with output amount and post-trade reserves
/// * `AmmError` if reserves are empty, input is zero, or the fee is invalid
pub fn quote_swap(
    reserve_in: u128,
    reserve_out: u128,
    amount_in: u128,
    fee: Fee,
) -> Result<SwapQuote, AmmError> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(AmmError::EmptyReserves);
    }
    if amount_in == 0 {
        return Err(AmmError::ZeroAmount);
    }

    let amount_in_after_fee = fee.apply(amount_in)?;
    let new_reserve_in = reserve_in.checked_add(amount_in).ok_or(AmmError::Overflow)?;

    let k = wide::product(reserve_in, reserve_out);

    // y1 on the fee-adjusted curve; x0 + Δin_net <= x0 + Δin, so no overflow
    let curve_in = U256::from(reserve_in) + U256::from(amount_in_after_fee);
    let on_curve = k / curve_in;

    // Smallest reserve on (zero fee) or strictly above the fee-less curve
    let floor_reserve = if fee.is_zero() {
        wide::div_ceil(k, U256::from(new_reserve_in))
    } else {
        k / U256::from(new_reserve_in) + U256::one()
    };

    let retained = on_curve.max(floor_reserve).min(U256::from(reserve_out));
    let new_reserve_out = wide::narrow(retained)?;
    let amount_out = reserve_out - new_reserve_out;

    debug_assert!(
        wide::product(new_reserve_in, new_reserve_out) > k
            || amount_out == 0
            || (fee.is_zero() && wide::product(new_reserve_in, new_reserve_out) >= k)
    );

    Ok(SwapQuote {
        amount_in,
        amount_in_after_fee,
        amount_out,
        new_reserve_in,
        new_reserve_out,
    })
}

/// Amount of the other token matching `amount` at the current reserve ratio
///
/// `amount · reserve_to / reserve_from`, rounded down.
pub fn quote_equivalent(amount: u128, reserve_from: u128, reserve_to: u128) -> Result<u128, AmmError> {
    if reserve_from == 0 {
        return Err(AmmError::EmptyReserves);
    }
    wide::mul_div(amount, reserve_to, reserve_from)
}
