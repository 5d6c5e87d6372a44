//! LiquidityPool: reserves, shares and swaps behind a single lock
//!
//! Every operation takes the pool mutex for its whole duration, so mutations
//! are totally ordered and reads always see the last committed state. A
//! mutation computes everything (pricing, new balances, token settlement)
//! before touching `PoolState`; any error returns with the pool and the
//! token ledger exactly as they were.

use crate::math::{bootstrap_shares, optimal_deposit, quote_equivalent, quote_swap, withdraw_amounts, SwapQuote};
use crate::state::{PoolDetails, PoolHeader, PoolSnapshot, PoolState};
use pairswap_common::{
    Address, DexError, EventSink, PoolConfig, PoolEvent, Result, TokenLedger, Transfer,
};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Which side of the pair is sold to the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    /// Sell token0, receive token1
    Token0ForToken1,
    /// Sell token1, receive token0
    Token1ForToken0,
}

pub struct LiquidityPool {
    header: PoolHeader,
    state: Mutex<PoolState>,
    ledger: Arc<dyn TokenLedger>,
    events: Arc<dyn EventSink>,
}

impl fmt::Debug for LiquidityPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiquidityPool")
            .field("header", &self.header)
            .field("state", &*self.lock())
            .finish()
    }
}

impl LiquidityPool {
    /// Create an empty pool for `(token0, token1)`.
    ///
    /// Token decimals are read from the ledger once and fixed for the life
    /// of the pool.
    ///
    /// # Errors
    /// * `InvalidPair` unless `token0 < token1` and neither is the zero address
    /// * `InvalidConfig` if the fee or share precision is out of range
    /// * `UnknownToken` if the ledger does not hold either token
    pub fn new(
        address: Address,
        token0: Address,
        token1: Address,
        config: PoolConfig,
        ledger: Arc<dyn TokenLedger>,
        events: Arc<dyn EventSink>,
    ) -> Result<Self> {
        if token0.is_zero() || token1.is_zero() || token0 >= token1 {
            return Err(DexError::InvalidPair);
        }
        config.validate()?;

        let decimals0 = ledger.decimals(token0)?;
        let decimals1 = ledger.decimals(token1)?;

        Ok(Self {
            header: PoolHeader { address, token0, token1, decimals0, decimals1, config },
            state: Mutex::new(PoolState::default()),
            ledger,
            events,
        })
    }

    /// Rebuild a pool from a snapshot taken with `snapshot`
    pub fn restore(snapshot: PoolSnapshot, ledger: Arc<dyn TokenLedger>, events: Arc<dyn EventSink>) -> Self {
        Self {
            header: snapshot.header,
            state: Mutex::new(snapshot.state),
            ledger,
            events,
        }
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            header: self.header.clone(),
            state: self.lock().clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PoolState> {
        // State is written only after every fallible step, so a poisoned
        // lock still guards a consistent value
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn address(&self) -> Address {
        self.header.address
    }

    pub fn token0(&self) -> Address {
        self.header.token0
    }

    pub fn token1(&self) -> Address {
        self.header.token1
    }

    pub fn config(&self) -> &PoolConfig {
        &self.header.config
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Current reserves and outstanding shares
    pub fn get_pool_details(&self) -> PoolDetails {
        self.lock().details()
    }

    /// Share balance of `account`
    pub fn shares(&self, account: Address) -> u128 {
        self.lock().shares_of(&account)
    }

    /// Every liquidity provider with a non-zero share balance
    pub fn holders(&self) -> Vec<(Address, u128)> {
        self.lock().shares.iter().map(|(a, s)| (*a, *s)).collect()
    }

    /// Direction of a swap selling `token_in`
    pub fn direction_for(&self, token_in: Address) -> Result<SwapDirection> {
        if token_in == self.header.token0 {
            Ok(SwapDirection::Token0ForToken1)
        } else if token_in == self.header.token1 {
            Ok(SwapDirection::Token1ForToken0)
        } else {
            Err(DexError::InvalidPair)
        }
    }

    fn tokens_for(&self, direction: SwapDirection) -> (Address, Address) {
        match direction {
            SwapDirection::Token0ForToken1 => (self.header.token0, self.header.token1),
            SwapDirection::Token1ForToken0 => (self.header.token1, self.header.token0),
        }
    }

    // ------------------------------------------------------------------
    // Estimators
    // ------------------------------------------------------------------

    /// token1 needed alongside `amount0` to deposit at the current ratio
    pub fn get_equivalent_token1_estimate(&self, amount0: u128) -> Result<u128> {
        let state = self.lock();
        Ok(quote_equivalent(amount0, state.reserve0, state.reserve1)?)
    }

    /// token0 needed alongside `amount1` to deposit at the current ratio
    pub fn get_equivalent_token0_estimate(&self, amount1: u128) -> Result<u128> {
        let state = self.lock();
        Ok(quote_equivalent(amount1, state.reserve1, state.reserve0)?)
    }

    /// token1 received for selling `amount_in` token0 now
    pub fn get_swap_token0_estimate(&self, amount_in: u128) -> Result<u128> {
        self.estimate(SwapDirection::Token0ForToken1, amount_in)
    }

    /// token0 received for selling `amount_in` token1 now
    pub fn get_swap_token1_estimate(&self, amount_in: u128) -> Result<u128> {
        self.estimate(SwapDirection::Token1ForToken0, amount_in)
    }

    /// Output of a swap against the current reserves; zero where the trade
    /// would buy nothing
    pub fn estimate(&self, direction: SwapDirection, amount_in: u128) -> Result<u128> {
        let state = self.lock();
        let quote = self.quote(&state, direction, amount_in)?;
        log::debug!(
            "pool {} estimate {:?} in={} out={}",
            self.header.address,
            direction,
            amount_in,
            quote.amount_out
        );
        Ok(quote.amount_out)
    }

    fn quote(&self, state: &PoolState, direction: SwapDirection, amount_in: u128) -> Result<SwapQuote> {
        if amount_in == 0 {
            return Err(DexError::ZeroAmount);
        }
        if state.is_empty() {
            return Err(DexError::EmptyPool);
        }
        let (reserve_in, reserve_out) = match direction {
            SwapDirection::Token0ForToken1 => (state.reserve0, state.reserve1),
            SwapDirection::Token1ForToken0 => (state.reserve1, state.reserve0),
        };
        Ok(quote_swap(reserve_in, reserve_out, amount_in, self.header.config.fee())?)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Deposit up to `(amount0_desired, amount1_desired)` and mint shares to
    /// `caller`.
    ///
    /// The first deposit sets the price and mints the geometric mean of the
    /// two amounts at share precision. Later deposits are trimmed to the
    /// current reserve ratio (rounding down) and mint the smaller pro-rata
    /// share count. The pool pulls the accepted amounts using the allowance
    /// `caller` granted to the pool address.
    ///
    /// # Returns
    /// * Shares minted
    ///
    /// # Errors
    /// * `ZeroAmount`, `InsufficientLiquidityMinted`
    /// * `InsufficientAllowance`, `InsufficientBalance` from the token ledger
    pub fn provide(&self, caller: Address, amount0_desired: u128, amount1_desired: u128) -> Result<u128> {
        if amount0_desired == 0 || amount1_desired == 0 {
            return Err(DexError::ZeroAmount);
        }

        let mut state = self.lock();
        let header = &self.header;

        let (amount0, amount1, minted) = if state.is_empty() {
            let minted = bootstrap_shares(
                amount0_desired,
                amount1_desired,
                header.decimals0,
                header.decimals1,
                header.config.share_decimals,
            )?;
            (amount0_desired, amount1_desired, minted)
        } else {
            let deposit = optimal_deposit(
                amount0_desired,
                amount1_desired,
                state.reserve0,
                state.reserve1,
                state.total_shares,
            )?;
            (deposit.amount0, deposit.amount1, deposit.shares)
        };

        let reserve0 = state.reserve0.checked_add(amount0).ok_or(DexError::Overflow)?;
        let reserve1 = state.reserve1.checked_add(amount1).ok_or(DexError::Overflow)?;
        let total_shares = state.total_shares.checked_add(minted).ok_or(DexError::Overflow)?;
        // Bounded by total_shares
        let holder_shares = state.shares_of(&caller) + minted;

        self.ledger.settle(&[
            Transfer::pull(header.token0, caller, header.address, amount0),
            Transfer::pull(header.token1, caller, header.address, amount1),
        ])?;

        state.reserve0 = reserve0;
        state.reserve1 = reserve1;
        state.total_shares = total_shares;
        state.set_shares(caller, holder_shares);

        log::info!(
            "pool {} provide by {}: {} token0 + {} token1 -> {} shares (total {})",
            header.address,
            caller,
            amount0,
            amount1,
            minted,
            total_shares
        );
        self.events.emit(PoolEvent::Provide {
            pool: header.address,
            provider: caller,
            amount0,
            amount1,
            shares: minted,
        });

        Ok(minted)
    }

    /// Burn `shares` of `caller` and pay out the pro-rata slice of both
    /// reserves, rounded down.
    ///
    /// Redeeming the last outstanding share pays out both reserves in full
    /// and returns the pool to the empty state.
    ///
    /// # Errors
    /// * `ZeroAmount` if `shares == 0`
    /// * `InsufficientShares` if `caller` owns fewer than `shares`
    pub fn withdraw(&self, caller: Address, shares: u128) -> Result<(u128, u128)> {
        if shares == 0 {
            return Err(DexError::ZeroAmount);
        }

        let mut state = self.lock();
        let header = &self.header;

        let owned = state.shares_of(&caller);
        if owned < shares {
            return Err(DexError::InsufficientShares);
        }

        let (amount0, amount1) = withdraw_amounts(shares, state.reserve0, state.reserve1, state.total_shares)?;

        self.ledger.settle(&[
            Transfer::push(header.token0, header.address, caller, amount0),
            Transfer::push(header.token1, header.address, caller, amount1),
        ])?;

        // Payouts never exceed reserves and shares never exceed owned
        state.reserve0 -= amount0;
        state.reserve1 -= amount1;
        state.total_shares -= shares;
        state.set_shares(caller, owned - shares);

        log::info!(
            "pool {} withdraw by {}: {} shares -> {} token0 + {} token1 (total {})",
            header.address,
            caller,
            shares,
            amount0,
            amount1,
            state.total_shares
        );
        self.events.emit(PoolEvent::Withdraw {
            pool: header.address,
            provider: caller,
            amount0,
            amount1,
            shares,
        });

        Ok((amount0, amount1))
    }

    /// Sell `amount_in` token0 for token1
    pub fn swap_token0(&self, caller: Address, amount_in: u128) -> Result<u128> {
        self.swap(caller, SwapDirection::Token0ForToken1, amount_in, 0)
    }

    /// Sell `amount_in` token1 for token0
    pub fn swap_token1(&self, caller: Address, amount_in: u128) -> Result<u128> {
        self.swap(caller, SwapDirection::Token1ForToken0, amount_in, 0)
    }

    /// Sell `amount_in` of one side and receive at least `min_amount_out`
    /// of the other.
    ///
    /// The whole input, fee included, joins the input reserve. The output is
    /// priced by the same function the estimators use.
    ///
    /// # Errors
    /// * `ZeroAmount`, `EmptyPool`
    /// * `InsufficientOutputAmount` if the input is too small to buy anything
    /// * `SlippageExceeded` if the output is below `min_amount_out`
    /// * `InsufficientAllowance`, `InsufficientBalance` from the token ledger
    pub fn swap(
        &self,
        caller: Address,
        direction: SwapDirection,
        amount_in: u128,
        min_amount_out: u128,
    ) -> Result<u128> {
        let mut state = self.lock();
        let header = &self.header;

        let quote = self.quote(&state, direction, amount_in)?;
        if quote.amount_out == 0 {
            return Err(DexError::InsufficientOutputAmount);
        }
        if quote.amount_out < min_amount_out {
            return Err(DexError::SlippageExceeded {
                minimum: min_amount_out,
                actual: quote.amount_out,
            });
        }

        let (token_in, token_out) = self.tokens_for(direction);
        self.ledger.settle(&[
            Transfer::pull(token_in, caller, header.address, amount_in),
            Transfer::push(token_out, header.address, caller, quote.amount_out),
        ])?;

        match direction {
            SwapDirection::Token0ForToken1 => {
                state.reserve0 = quote.new_reserve_in;
                state.reserve1 = quote.new_reserve_out;
            }
            SwapDirection::Token1ForToken0 => {
                state.reserve1 = quote.new_reserve_in;
                state.reserve0 = quote.new_reserve_out;
            }
        }

        log::info!(
            "pool {} swap by {}: {} {} -> {} {} (reserves {}/{})",
            header.address,
            caller,
            amount_in,
            token_in.short(),
            quote.amount_out,
            token_out.short(),
            state.reserve0,
            state.reserve1
        );
        self.events.emit(PoolEvent::Swap {
            pool: header.address,
            trader: caller,
            token_in,
            amount_in,
            token_out,
            amount_out: quote.amount_out,
        });

        Ok(quote.amount_out)
    }
}
