//! End-to-end scenarios across registry, pools and the token bank

use pairswap_amm::SwapDirection;
use pairswap_common::{Address, DexError, EventLog, NullSink, PoolConfig, PoolEvent, TokenBank, TokenLedger};
use pairswap_integration_tests::{account, Harness};
use pairswap_registry::PairRegistry;
use std::sync::Arc;

#[test]
fn test_fixture_provide_then_swap() {
    let h = Harness::new(2, 1_000_000);
    let (alice, bob) = (h.accounts[0], h.accounts[1]);

    assert_eq!(h.pool.provide(alice, 100, 400).unwrap(), 200);
    assert_eq!(h.pool.get_equivalent_token1_estimate(25).unwrap(), 100);
    assert_eq!(h.pool.swap_token0(bob, 10).unwrap(), 34);

    assert_eq!(h.balances(bob), (1_000_000 - 10, 1_000_000 + 34));
    h.assert_invariants("after fixture");
}

#[test]
fn test_registry_rejects_duplicates_in_either_order() {
    let bank = Arc::new(TokenBank::new());
    let events = Arc::new(EventLog::new());
    let registry = PairRegistry::new(PoolConfig::default(), bank.clone(), events.clone()).unwrap();
    let a = bank.create_token("Alpha", "ALP", 18);
    let b = bank.create_token("Beta", "BET", 8);
    let c = bank.create_token("Gamma", "GAM", 6);

    let ab = registry.create_pair(a, b).unwrap();
    assert_eq!(registry.create_pair(b, a), Err(DexError::PairAlreadyExists));
    assert_eq!(registry.create_pair(a, b), Err(DexError::PairAlreadyExists));
    assert_eq!(registry.create_pair(c, c), Err(DexError::InvalidPair));
    assert_eq!(registry.create_pair(Address::ZERO, c), Err(DexError::InvalidPair));

    let bc = registry.create_pair(c, b).unwrap();
    assert_ne!(ab, bc);
    assert_eq!(registry.registry(a, b), registry.registry(b, a));
    assert_eq!(registry.registry(a, c), None);
    assert_eq!(registry.all_pools(), vec![ab, bc]);

    let created: Vec<_> = events
        .events()
        .into_iter()
        .filter(|e| matches!(e, PoolEvent::PairCreated { .. }))
        .collect();
    assert_eq!(created.len(), 2);
}

#[test]
fn test_pools_are_independent() {
    let bank = Arc::new(TokenBank::new());
    let registry = PairRegistry::new(PoolConfig::default(), bank.clone(), Arc::new(NullSink)).unwrap();
    let tokens: Vec<_> = (0..3).map(|i| bank.create_token(&format!("T{i}"), &format!("T{i}"), 6)).collect();
    let lp = account(1);

    let p01 = registry.pool(registry.create_pair(tokens[0], tokens[1]).unwrap()).unwrap();
    let p12 = registry.pool(registry.create_pair(tokens[1], tokens[2]).unwrap()).unwrap();
    for token in &tokens {
        bank.mint(*token, lp, 10_000).unwrap();
        bank.approve(*token, lp, p01.address(), u128::MAX).unwrap();
        bank.approve(*token, lp, p12.address(), u128::MAX).unwrap();
    }

    p01.provide(lp, 1_000, 1_000).unwrap();
    p12.provide(lp, 500, 2_000).unwrap();
    p01.swap_token0(lp, 100).unwrap();

    assert_eq!(p12.get_pool_details().reserve0, 500);
    assert_eq!(bank.balance_of(tokens[1], p12.address()), 500);
    assert_eq!(bank.balance_of(tokens[1], lp), 10_000 - p01.get_pool_details().reserve1 - 500);
}

#[test]
fn test_mixed_decimals_bootstrap_uses_share_precision() {
    let h = Harness::with_config(PoolConfig::default(), 18, 6, 1, 0);
    let lp = h.accounts[0];
    let one_token0 = 1_000_000_000_000_000_000u128;
    h.bank.mint(h.token0, lp, 10 * one_token0).unwrap();
    h.bank.mint(h.token1, lp, 100_000_000).unwrap();

    // 1 whole token0 against 4 whole token1: sqrt(1e6 * 4e6) at 6 decimals
    let minted = h.pool.provide(lp, one_token0, 4_000_000).unwrap();
    assert_eq!(minted, 2_000_000);
    h.assert_invariants("mixed decimals");
}

#[test]
fn test_failed_provide_changes_nothing() {
    let h = Harness::new(2, 1_000);
    let (alice, carol) = (h.accounts[0], account(9));
    h.pool.provide(alice, 100, 400).unwrap();

    // carol is funded but has only approved token0
    h.bank.mint(h.token0, carol, 1_000).unwrap();
    h.bank.mint(h.token1, carol, 1_000).unwrap();
    h.bank.approve(h.token0, carol, h.pool.address(), 1_000).unwrap();

    let before = h.snapshot();
    let events_before = h.events.len();
    assert_eq!(h.pool.provide(carol, 10, 40), Err(DexError::InsufficientAllowance));
    assert_eq!(h.snapshot(), before);
    assert_eq!(h.events.len(), events_before);
}

#[test]
fn test_failed_swap_changes_nothing() {
    let h = Harness::new(2, 1_000);
    let (alice, bob) = (h.accounts[0], h.accounts[1]);
    h.pool.provide(alice, 100, 400).unwrap();

    let before = h.snapshot();
    assert_eq!(h.pool.swap_token0(bob, 5_000), Err(DexError::InsufficientBalance));
    assert!(matches!(
        h.pool.swap(bob, SwapDirection::Token1ForToken0, 40, 1_000),
        Err(DexError::SlippageExceeded { minimum: 1_000, .. })
    ));
    assert_eq!(h.pool.swap_token1(bob, 0), Err(DexError::ZeroAmount));
    assert_eq!(h.snapshot(), before);
}

#[test]
fn test_lp_lifecycle_returns_pool_to_empty() {
    let h = Harness::new(3, 1_000_000);
    let (alice, bob, trader) = (h.accounts[0], h.accounts[1], h.accounts[2]);

    h.pool.provide(alice, 10_000, 20_000).unwrap();
    h.pool.provide(bob, 5_000, 10_000).unwrap();
    let opened = h.pool.get_pool_details();
    for _ in 0..5 {
        h.pool.swap_token0(trader, 700).unwrap();
        h.pool.swap_token1(trader, 1_300).unwrap();
    }
    h.assert_invariants("after trading");

    // Fees stay in the pool: same shares, larger product
    let traded = h.pool.get_pool_details();
    assert_eq!(traded.total_shares, opened.total_shares);
    assert!(traded.product() > opened.product());

    h.pool.withdraw(bob, h.pool.shares(bob)).unwrap();
    h.pool.withdraw(alice, h.pool.shares(alice)).unwrap();
    assert!(h.pool.is_empty());
    h.assert_invariants("after exit");

    let (a0, a1) = h.balances(alice);
    let (b0, b1) = h.balances(bob);
    let (t0, t1) = h.balances(trader);
    assert_eq!(a0 + b0 + t0, 3_000_000);
    assert_eq!(a1 + b1 + t1, 3_000_000);

    // A new first deposit may set a fresh price
    h.pool.provide(bob, 1_000, 1_000).unwrap();
    assert_eq!(h.pool.get_equivalent_token0_estimate(10).unwrap(), 10);
}

#[test]
fn test_event_stream_matches_operations() {
    let h = Harness::new(2, 1_000_000);
    let (alice, bob) = (h.accounts[0], h.accounts[1]);
    h.events.drain();

    h.pool.provide(alice, 1_000, 4_000).unwrap();
    let out = h.pool.swap_token1(bob, 400).unwrap();
    h.pool.withdraw(alice, 500).unwrap();

    let events = h.events.drain();
    assert_eq!(events.len(), 3);
    assert_eq!(
        events[1],
        PoolEvent::Swap {
            pool: h.pool.address(),
            trader: bob,
            token_in: h.token1,
            amount_in: 400,
            token_out: h.token0,
            amount_out: out,
        }
    );
}
