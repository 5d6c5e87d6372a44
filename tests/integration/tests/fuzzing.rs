//! Property suites for the constant-product pool
//!
//! Increase cases: PROPTEST_CASES=1000 cargo test -p pairswap-integration-tests
//!
//! - Action-based state machine with "no mutation on error" checking
//! - Invariant non-decrease across swap sequences
//! - Deposit/withdraw round trips and proportional exit
//! - Estimator/execution parity

use pairswap_amm::SwapDirection;
use pairswap_common::PoolConfig;
use pairswap_integration_tests::Harness;
use proptest::prelude::*;

// ============================================================================
// SECTION 1: ACTIONS
// ============================================================================

#[derive(Clone, Debug)]
enum Action {
    Provide { who: usize, amount0: u128, amount1: u128 },
    Withdraw { who: usize, shares: u128 },
    WithdrawAll { who: usize },
    Swap { who: usize, zero_for_one: bool, amount: u128, min_out: u128 },
}

const TRADERS: usize = 4;
const FUNDING: u128 = 1_000_000_000_000;

/// Weighted toward operations that usually succeed, with enough oversized
/// and zero inputs to exercise every rejection path
fn action_strategy() -> impl Strategy<Value = Action> {
    let who = 0..TRADERS;
    prop_oneof![
        4 => (who.clone(), 0u128..5_000_000, 0u128..5_000_000)
            .prop_map(|(who, amount0, amount1)| Action::Provide { who, amount0, amount1 }),
        2 => (who.clone(), 0u128..3_000_000)
            .prop_map(|(who, shares)| Action::Withdraw { who, shares }),
        1 => who.clone().prop_map(|who| Action::WithdrawAll { who }),
        8 => (who, any::<bool>(), 0u128..2_000_000, prop_oneof![3 => Just(0u128), 1 => 0u128..1_000_000])
            .prop_map(|(who, zero_for_one, amount, min_out)| Action::Swap { who, zero_for_one, amount, min_out }),
    ]
}

fn config_strategy() -> impl Strategy<Value = PoolConfig> {
    prop_oneof![
        Just(PoolConfig::default()),
        (1u64..=1_000).prop_map(|fee_numerator| PoolConfig {
            fee_numerator,
            fee_denominator: 1_000,
            share_decimals: 6,
        }),
        (0u8..=12).prop_map(|share_decimals| PoolConfig { share_decimals, ..PoolConfig::default() }),
    ]
}

// ============================================================================
// SECTION 2: STATE MACHINE
// ============================================================================

struct FuzzState {
    h: Harness,
}

impl FuzzState {
    fn new(config: PoolConfig) -> Self {
        Self { h: Harness::with_config(config, 6, 6, TRADERS as u64, FUNDING) }
    }

    fn execute(&self, action: &Action, step: usize) {
        let context = format!("Step {} ({:?})", step, action);
        let h = &self.h;
        let before = h.snapshot();
        let details = h.pool.get_pool_details();

        let ok = match *action {
            Action::Provide { who, amount0, amount1 } => {
                let account = h.accounts[who];
                let held = h.pool.shares(account);
                match h.pool.provide(account, amount0, amount1) {
                    Ok(minted) => {
                        assert!(minted > 0, "{}: zero shares minted", context);
                        assert_eq!(h.pool.shares(account), held + minted, "{}", context);
                        let after = h.pool.get_pool_details();
                        assert!(after.reserve0 - details.reserve0 <= amount0, "{}: took too much token0", context);
                        assert!(after.reserve1 - details.reserve1 <= amount1, "{}: took too much token1", context);
                        true
                    }
                    Err(_) => false,
                }
            }
            Action::Withdraw { who, shares } => h.pool.withdraw(h.accounts[who], shares).is_ok(),
            Action::WithdrawAll { who } => {
                let account = h.accounts[who];
                let shares = h.pool.shares(account);
                match h.pool.withdraw(account, shares) {
                    Ok(_) => {
                        assert_eq!(h.pool.shares(account), 0, "{}", context);
                        true
                    }
                    Err(_) => false,
                }
            }
            Action::Swap { who, zero_for_one, amount, min_out } => {
                let direction = if zero_for_one {
                    SwapDirection::Token0ForToken1
                } else {
                    SwapDirection::Token1ForToken0
                };
                let estimate = h.pool.estimate(direction, amount);
                match h.pool.swap(h.accounts[who], direction, amount, min_out) {
                    Ok(out) => {
                        assert_eq!(estimate, Ok(out), "{}: estimate differs from execution", context);
                        assert!(out >= min_out && out > 0, "{}", context);
                        let after = h.pool.get_pool_details();
                        if h.pool.config().fee().is_zero() {
                            assert!(after.product() >= details.product(), "{}: product shrank", context);
                        } else {
                            assert!(after.product() > details.product(), "{}: product did not grow", context);
                        }
                        assert_eq!(after.total_shares, details.total_shares, "{}", context);
                        true
                    }
                    Err(_) => false,
                }
            }
        };

        if !ok {
            assert_eq!(h.snapshot(), before, "{}: failed operation mutated state", context);
        }
        h.assert_invariants(&context);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn fuzz_state_machine(
        config in config_strategy(),
        actions in prop::collection::vec(action_strategy(), 20..80)
    ) {
        let state = FuzzState::new(config);
        for (step, action) in actions.iter().enumerate() {
            state.execute(action, step);
        }
    }
}

// ============================================================================
// SECTION 3: FOCUSED PROPERTIES
// ============================================================================

fn reserve_strategy() -> impl Strategy<Value = u128> {
    1_000u128..1_000_000_000
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Every successful swap strictly grows reserve0 * reserve1
    #[test]
    fn fuzz_swaps_never_shrink_product(
        reserve0 in reserve_strategy(),
        reserve1 in reserve_strategy(),
        swaps in prop::collection::vec((any::<bool>(), 1u128..100_000_000), 1..30)
    ) {
        let h = Harness::new(2, 10_000_000_000);
        h.pool.provide(h.accounts[0], reserve0, reserve1).unwrap();
        let trader = h.accounts[1];

        for (zero_for_one, amount) in swaps {
            let before = h.pool.get_pool_details().product();
            let result = if zero_for_one {
                h.pool.swap_token0(trader, amount)
            } else {
                h.pool.swap_token1(trader, amount)
            };
            let after = h.pool.get_pool_details().product();
            match result {
                Ok(_) => prop_assert!(after > before),
                Err(_) => prop_assert_eq!(after, before),
            }
        }
        h.assert_invariants("after swaps");
    }

    /// A late LP who deposits and immediately exits never gains, and never
    /// dilutes the incumbent's per-share value
    #[test]
    fn fuzz_round_trip_never_profits(
        reserve0 in reserve_strategy(),
        reserve1 in reserve_strategy(),
        amount0 in 1u128..1_000_000_000,
        amount1 in 1u128..1_000_000_000,
    ) {
        let h = Harness::new(2, 10_000_000_000);
        let (incumbent, late) = (h.accounts[0], h.accounts[1]);
        h.pool.provide(incumbent, reserve0, reserve1).unwrap();
        let start = h.pool.get_pool_details();
        let wallet = h.balances(late);

        if let Ok(minted) = h.pool.provide(late, amount0, amount1) {
            let paid = (wallet.0 - h.balances(late).0, wallet.1 - h.balances(late).1);
            let (got0, got1) = h.pool.withdraw(late, minted).unwrap();
            prop_assert!(got0 <= paid.0);
            prop_assert!(got1 <= paid.1);

            // reserve / total_shares non-decreasing, cross-multiplied
            let end = h.pool.get_pool_details();
            prop_assert_eq!(end.total_shares, start.total_shares);
            prop_assert!(end.reserve0 >= start.reserve0);
            prop_assert!(end.reserve1 >= start.reserve1);
        }
        h.assert_invariants("after round trip");
    }

    /// A sole LP redeeming everything receives the full reserves
    #[test]
    fn fuzz_sole_lp_exit_empties_pool(
        reserve0 in reserve_strategy(),
        reserve1 in reserve_strategy(),
        swaps in prop::collection::vec((any::<bool>(), 1u128..10_000_000), 0..10)
    ) {
        let h = Harness::new(2, 10_000_000_000);
        let (lp, trader) = (h.accounts[0], h.accounts[1]);
        h.pool.provide(lp, reserve0, reserve1).unwrap();
        for (zero_for_one, amount) in swaps {
            let _ = if zero_for_one { h.pool.swap_token0(trader, amount) } else { h.pool.swap_token1(trader, amount) };
        }

        let details = h.pool.get_pool_details();
        let out = h.pool.withdraw(lp, h.pool.shares(lp)).unwrap();
        prop_assert_eq!(out, (details.reserve0, details.reserve1));
        prop_assert!(h.pool.is_empty());
        h.assert_invariants("after exit");
    }

    /// Partial withdrawals pay exactly floor(reserve * shares / total)
    #[test]
    fn fuzz_withdraw_is_proportional(
        reserve0 in reserve_strategy(),
        reserve1 in reserve_strategy(),
        fraction in 1u128..=1_000,
    ) {
        let h = Harness::new(1, 10_000_000_000);
        let lp = h.accounts[0];
        h.pool.provide(lp, reserve0, reserve1).unwrap();
        let details = h.pool.get_pool_details();
        let shares = (details.total_shares * fraction / 1_000).max(1);

        let (out0, out1) = h.pool.withdraw(lp, shares).unwrap();
        prop_assert_eq!(out0, details.reserve0 * shares / details.total_shares);
        prop_assert_eq!(out1, details.reserve1 * shares / details.total_shares);
    }

    /// Estimators report exactly what execution then delivers
    #[test]
    fn fuzz_estimate_matches_execution(
        reserve0 in reserve_strategy(),
        reserve1 in reserve_strategy(),
        amount in 1u128..100_000_000,
        zero_for_one in any::<bool>(),
    ) {
        let h = Harness::new(2, 10_000_000_000);
        h.pool.provide(h.accounts[0], reserve0, reserve1).unwrap();

        let estimate = if zero_for_one {
            h.pool.get_swap_token0_estimate(amount).unwrap()
        } else {
            h.pool.get_swap_token1_estimate(amount).unwrap()
        };
        let executed = if zero_for_one {
            h.pool.swap_token0(h.accounts[1], amount)
        } else {
            h.pool.swap_token1(h.accounts[1], amount)
        };
        match executed {
            Ok(out) => prop_assert_eq!(out, estimate),
            Err(e) => {
                prop_assert_eq!(estimate, 0);
                prop_assert_eq!(e, pairswap_common::DexError::InsufficientOutputAmount);
            }
        }
    }
}
