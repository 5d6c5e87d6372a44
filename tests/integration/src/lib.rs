//! Shared harness for the cross-crate scenario, property and concurrency suites

use pairswap_amm::{LiquidityPool, PoolSnapshot};
use pairswap_common::{Address, BankSnapshot, EventLog, PoolConfig, TokenBank, TokenLedger, UNLIMITED_ALLOWANCE};
use pairswap_registry::PairRegistry;
use std::sync::Arc;

pub fn account(n: u64) -> Address {
    Address::derive(b"pairswap/account", n)
}

/// One registry with a single pair of tokens and a set of funded traders
pub struct Harness {
    pub bank: Arc<TokenBank>,
    pub events: Arc<EventLog>,
    pub registry: PairRegistry,
    pub token0: Address,
    pub token1: Address,
    pub pool: Arc<LiquidityPool>,
    pub accounts: Vec<Address>,
}

impl Harness {
    /// Two 6-decimal tokens, default fee, `accounts` traders holding
    /// `funding` of each token with unlimited allowance for the pool
    pub fn new(accounts: u64, funding: u128) -> Self {
        Self::with_config(PoolConfig::default(), 6, 6, accounts, funding)
    }

    pub fn with_config(config: PoolConfig, decimals0: u8, decimals1: u8, accounts: u64, funding: u128) -> Self {
        let bank = Arc::new(TokenBank::new());
        let events = Arc::new(EventLog::new());
        // Sequential token addresses: the first token created sorts first
        let token0 = bank.create_token("Token0", "TK0", decimals0);
        let token1 = bank.create_token("Token1", "TK1", decimals1);

        let registry = PairRegistry::new(config, bank.clone(), events.clone()).expect("valid config");
        let address = registry.create_pair(token1, token0).expect("fresh pair");
        let pool = registry.pool(address).expect("pool just created");

        let mut harness = Self { bank, events, registry, token0, token1, pool, accounts: Vec::new() };
        for n in 0..accounts {
            let who = account(n);
            harness.fund(who, funding);
            harness.accounts.push(who);
        }
        harness
    }

    /// Mint `amount` of both tokens to `who` and approve the pool without limit
    pub fn fund(&self, who: Address, amount: u128) {
        for token in [self.token0, self.token1] {
            if amount > 0 {
                self.bank.mint(token, who, amount).expect("mint");
            }
            self.bank
                .approve(token, who, self.pool.address(), UNLIMITED_ALLOWANCE)
                .expect("approve");
        }
    }

    pub fn balances(&self, who: Address) -> (u128, u128) {
        (self.bank.balance_of(self.token0, who), self.bank.balance_of(self.token1, who))
    }

    /// Full image of the pool and every token book
    pub fn snapshot(&self) -> (PoolSnapshot, BankSnapshot) {
        (self.pool.snapshot(), self.bank.snapshot())
    }

    /// Structural invariants that must hold after any sequence of operations
    pub fn assert_invariants(&self, context: &str) {
        let details = self.pool.get_pool_details();
        let holders = self.pool.holders();

        let sum: u128 = holders.iter().map(|(_, s)| *s).sum();
        assert_eq!(sum, details.total_shares, "{}: shares do not sum to total", context);
        assert!(holders.iter().all(|(_, s)| *s > 0), "{}: zero share entry kept", context);

        let (held0, held1) = self.balances(self.pool.address());
        assert_eq!(held0, details.reserve0, "{}: reserve0 differs from pool balance", context);
        assert_eq!(held1, details.reserve1, "{}: reserve1 differs from pool balance", context);

        if details.total_shares == 0 {
            assert_eq!((details.reserve0, details.reserve1), (0, 0), "{}: empty pool holds reserves", context);
        } else {
            assert!(details.reserve0 > 0 && details.reserve1 > 0, "{}: active pool drained", context);
        }
    }
}
