//! 256-bit intermediates for products of two `u128` amounts

use crate::AmmError;
use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer for reserve products
    pub struct U256(4);
}

/// a · b without overflow
#[inline]
pub fn product(a: u128, b: u128) -> U256 {
    // Cannot overflow: (2^128 - 1)^2 < 2^256
    U256::from(a) * U256::from(b)
}

#[inline]
pub(crate) fn narrow(value: U256) -> Result<u128, AmmError> {
    if value.bits() > 128 {
        return Err(AmmError::Overflow);
    }
    Ok(value.low_u128())
}

/// floor(a * b / c)
#[inline]
pub(crate) fn mul_div(a: u128, b: u128, c: u128) -> Result<u128, AmmError> {
    if c == 0 {
        return Err(AmmError::Overflow);
    }
    narrow(product(a, b) / U256::from(c))
}

/// ceil(a / b) for b > 0
#[inline]
pub(crate) fn div_ceil(a: U256, b: U256) -> U256 {
    let (quotient, remainder) = a.div_mod(b);
    if remainder.is_zero() {
        quotient
    } else {
        quotient + U256::one()
    }
}

/// floor(sqrt(a * b))
#[inline]
pub(crate) fn sqrt_product(a: u128, b: u128) -> u128 {
    // sqrt of a value below 2^256 is below 2^128
    product(a, b).integer_sqrt().low_u128()
}
