//! Pool state layout

use amm_model::U256;
use pairswap_common::{Address, PoolConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable part of a pool, fixed at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolHeader {
    /// Address of the pool itself; holds the reserves on the token ledger
    pub address: Address,
    /// token0 < token1
    pub token0: Address,
    pub token1: Address,
    pub decimals0: u8,
    pub decimals1: u8,
    pub config: PoolConfig,
}

/// Mutable part of a pool, guarded by the pool lock
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    pub reserve0: u128,
    pub reserve1: u128,
    pub total_shares: u128,
    /// Share balance per liquidity provider; sums to `total_shares`
    pub shares: BTreeMap<Address, u128>,
}

impl PoolState {
    /// Empty: no shares outstanding (and therefore no reserves)
    pub fn is_empty(&self) -> bool {
        self.total_shares == 0
    }

    pub fn shares_of(&self, account: &Address) -> u128 {
        self.shares.get(account).copied().unwrap_or(0)
    }

    pub(crate) fn set_shares(&mut self, account: Address, amount: u128) {
        if amount == 0 {
            self.shares.remove(&account);
        } else {
            self.shares.insert(account, amount);
        }
    }

    pub fn details(&self) -> PoolDetails {
        PoolDetails {
            reserve0: self.reserve0,
            reserve1: self.reserve1,
            total_shares: self.total_shares,
        }
    }
}

/// Reserves and outstanding shares, as read by `get_pool_details`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDetails {
    pub reserve0: u128,
    pub reserve1: u128,
    pub total_shares: u128,
}

impl PoolDetails {
    /// reserve0 · reserve1, widened to 256 bits
    pub fn product(&self) -> U256 {
        amm_model::product(self.reserve0, self.reserve1)
    }
}

/// Serializable image of a pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub header: PoolHeader,
    pub state: PoolState,
}
