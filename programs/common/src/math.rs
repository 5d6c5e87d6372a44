//! Fixed-point display helpers for token and share amounts

use crate::{DexError, Result};

/// Render `amount` smallest units with `decimals` places, trimming trailing zeros
pub fn format_units(amount: u128, decimals: u8) -> String {
    let Some(scale) = 10u128.checked_pow(u32::from(decimals)) else {
        // Every u128 is below one whole unit
        return format!("0.{:0>width$}", amount, width = usize::from(decimals))
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string();
    };
    let whole = amount / scale;
    let frac = amount % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0>width$}", frac, width = usize::from(decimals));
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// Parse a decimal string such as `"12.5"` into smallest units
pub fn parse_units(value: &str, decimals: u8) -> Result<u128> {
    let invalid = || DexError::InvalidAmount(value.to_string());

    let value = value.trim().replace('_', "");
    let (whole, frac) = match value.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (value.as_str(), ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac.len() > usize::from(decimals) {
        return Err(DexError::InvalidAmount(format!(
            "{} has more than {} decimal places",
            value, decimals
        )));
    }

    let scale = 10u128.checked_pow(u32::from(decimals)).ok_or(DexError::Overflow)?;
    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| DexError::Overflow)? };
    let frac_units: u128 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = usize::from(decimals));
        padded.parse().map_err(|_| invalid())?
    };

    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac_units))
        .ok_or(DexError::Overflow)
}
