//! Kani proofs for AMM constant product invariants
//!
//! These proofs verify that the pool math satisfies key safety properties:
//! - **A1: Invariant Non-Decreasing** - x·y never decreases across a swap
//! - **A2: Reserves Stay Positive** - a swap can never drain the output side
//! - **A3: No Panic** - every input returns `Ok` or `Err`
//! - **A4: Deterministic** - same inputs always produce same outputs
//! - **A5: Withdrawals Bounded** - redeeming shares never pays out more than the pro-rata slice
//! - **A6: Deposits Do Not Dilute** - minted shares never exceed either pro-rata count

use amm_model::{optimal_deposit, quote_swap, withdraw_amounts, Fee};

fn fee_any() -> Fee {
    let numerator: u128 = kani::any();
    let denominator: u128 = kani::any();
    kani::assume(denominator > 0 && denominator <= 10_000);
    kani::assume(numerator > 0 && numerator <= denominator);
    Fee::new(numerator, denominator)
}

/// A1: x·y after a swap is never below x·y before it, and grows on every
/// paid swap when a fee is charged
#[kani::proof]
#[kani::unwind(4)]
fn a1_invariant_non_decreasing() {
    let x0: u32 = kani::any();
    let y0: u32 = kani::any();
    let dx: u32 = kani::any();
    let fee = fee_any();

    kani::assume(x0 > 0 && y0 > 0 && dx > 0);

    if let Ok(quote) = quote_swap(x0 as u128, y0 as u128, dx as u128, fee) {
        let k0 = (x0 as u128) * (y0 as u128);
        let k1 = quote.new_reserve_in * quote.new_reserve_out;

        assert!(k1 >= k0, "A1: invariant must not decrease");
        if quote.amount_out > 0 && !fee.is_zero() {
            assert!(k1 > k0, "A1: paying out must strictly grow the invariant");
        }
    }
}

/// A2: the output reserve stays positive and only ever shrinks by amount_out
#[kani::proof]
#[kani::unwind(4)]
fn a2_reserves_stay_positive() {
    let x0: u64 = kani::any();
    let y0: u64 = kani::any();
    let dx: u64 = kani::any();

    kani::assume(x0 > 0 && y0 > 0 && dx > 0);

    if let Ok(quote) = quote_swap(x0 as u128, y0 as u128, dx as u128, Fee::default()) {
        assert!(quote.new_reserve_out > 0, "A2: output reserve must stay positive");
        assert_eq!(quote.new_reserve_out + quote.amount_out, y0 as u128);
        assert_eq!(quote.new_reserve_in, x0 as u128 + dx as u128);
    }
}

/// A3: arbitrary inputs never panic
#[kani::proof]
#[kani::unwind(4)]
fn a3_no_panic() {
    let x0: u128 = kani::any();
    let y0: u128 = kani::any();
    let dx: u128 = kani::any();
    let fee = Fee::new(kani::any(), kani::any());

    let _ = quote_swap(x0, y0, dx, fee);
}

/// A4: same inputs, same outputs
#[kani::proof]
#[kani::unwind(4)]
fn a4_determinism() {
    let x: u64 = kani::any();
    let y: u64 = kani::any();
    let dx: u64 = kani::any();

    let first = quote_swap(x as u128, y as u128, dx as u128, Fee::default());
    let second = quote_swap(x as u128, y as u128, dx as u128, Fee::default());

    assert_eq!(first, second, "A4: quote_swap must be deterministic");
}

/// A5: redeeming s of S shares pays at most s/S of each reserve
#[kani::proof]
#[kani::unwind(4)]
fn a5_withdrawal_bounded() {
    let shares: u64 = kani::any();
    let total: u64 = kani::any();
    let r0: u64 = kani::any();
    let r1: u64 = kani::any();

    kani::assume(total > 0);

    if let Ok((a0, a1)) = withdraw_amounts(shares as u128, r0 as u128, r1 as u128, total as u128) {
        assert!(a0 * (total as u128) <= (r0 as u128) * (shares as u128));
        assert!(a1 * (total as u128) <= (r1 as u128) * (shares as u128));
        if shares == total {
            assert_eq!((a0, a1), (r0 as u128, r1 as u128), "A5: last holder empties the pool");
        }
    }
}

/// A6: minted shares never exceed the pro-rata count of either token
#[kani::proof]
#[kani::unwind(4)]
fn a6_deposit_no_dilution() {
    let d0: u64 = kani::any();
    let d1: u64 = kani::any();
    let r0: u64 = kani::any();
    let r1: u64 = kani::any();
    let total: u64 = kani::any();

    if let Ok(deposit) = optimal_deposit(d0 as u128, d1 as u128, r0 as u128, r1 as u128, total as u128) {
        assert!(deposit.amount0 <= d0 as u128 && deposit.amount1 <= d1 as u128);
        assert!(deposit.shares * (r0 as u128) <= (total as u128) * deposit.amount0);
        assert!(deposit.shares * (r1 as u128) <= (total as u128) * deposit.amount1);
    }
}
