//! PairRegistry: canonical pair → pool mapping
//!
//! The registry owns every pool it creates and hands out `Arc` handles.
//! Pair records are created once and never removed.

use pairswap_amm::{LiquidityPool, PoolSnapshot};
use pairswap_common::{Address, DexError, EventSink, PoolConfig, PoolEvent, Result, TokenLedger, MAX_TAG_LEN};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Address tag for pools created by a registry
pub const POOL_TAG: &[u8] = b"pairswap/pool";
const _: () = assert!(POOL_TAG.len() <= MAX_TAG_LEN);

/// One registered pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRecord {
    pub token0: Address,
    pub token1: Address,
    pub pool: Address,
}

/// Serializable image of a registry and all of its pools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub config: PoolConfig,
    /// Creation order
    pub records: Vec<PoolRecord>,
    pub pools: Vec<PoolSnapshot>,
    pub next_nonce: u64,
}

/// Order two token addresses into a pair key
///
/// # Errors
/// * `InvalidPair` if the tokens are equal or either is the zero address
pub fn canonical_pair(token_a: Address, token_b: Address) -> Result<(Address, Address)> {
    if token_a == token_b || token_a.is_zero() || token_b.is_zero() {
        return Err(DexError::InvalidPair);
    }
    if token_a < token_b {
        Ok((token_a, token_b))
    } else {
        Ok((token_b, token_a))
    }
}

#[derive(Default)]
struct RegistryState {
    pairs: BTreeMap<(Address, Address), Address>,
    records: Vec<PoolRecord>,
    pools: HashMap<Address, Arc<LiquidityPool>>,
    next_nonce: u64,
}

pub struct PairRegistry {
    config: PoolConfig,
    ledger: Arc<dyn TokenLedger>,
    events: Arc<dyn EventSink>,
    state: Mutex<RegistryState>,
}

impl PairRegistry {
    /// Empty registry whose pools will all use `config`
    pub fn new(config: PoolConfig, ledger: Arc<dyn TokenLedger>, events: Arc<dyn EventSink>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ledger,
            events,
            state: Mutex::new(RegistryState::default()),
        })
    }

    /// Rebuild a registry, and every pool in it, from `snapshot`
    ///
    /// # Errors
    /// * `InvalidConfig` if the stored config no longer validates
    /// * `UnknownPool` if a record has no matching pool image
    /// * `PairAlreadyExists` if two records share a pair key
    pub fn restore(
        snapshot: RegistrySnapshot,
        ledger: Arc<dyn TokenLedger>,
        events: Arc<dyn EventSink>,
    ) -> Result<Self> {
        snapshot.config.validate()?;

        let mut images: HashMap<Address, PoolSnapshot> = snapshot
            .pools
            .into_iter()
            .map(|image| (image.header.address, image))
            .collect();

        let mut state = RegistryState {
            next_nonce: snapshot.next_nonce,
            ..RegistryState::default()
        };
        for record in snapshot.records {
            let key = canonical_pair(record.token0, record.token1)?;
            if key != (record.token0, record.token1) {
                return Err(DexError::InvalidPair);
            }
            if state.pairs.insert(key, record.pool).is_some() {
                return Err(DexError::PairAlreadyExists);
            }
            let image = images.remove(&record.pool).ok_or(DexError::UnknownPool(record.pool))?;
            let pool = LiquidityPool::restore(image, ledger.clone(), events.clone());
            state.pools.insert(record.pool, Arc::new(pool));
            state.records.push(record);
        }

        log::debug!("registry restored with {} pools", state.records.len());
        Ok(Self {
            config: snapshot.config,
            ledger,
            events,
            state: Mutex::new(state),
        })
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.lock();
        let pools = state
            .records
            .iter()
            .filter_map(|record| state.pools.get(&record.pool))
            .map(|pool| pool.snapshot())
            .collect();
        RegistrySnapshot {
            config: self.config,
            records: state.records.clone(),
            pools,
            next_nonce: state.next_nonce,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Create the pool for `(token_a, token_b)` in either order.
    ///
    /// # Returns
    /// * Address of the new pool
    ///
    /// # Errors
    /// * `InvalidPair` for identical or zero tokens
    /// * `PairAlreadyExists` if the pair already has a pool
    /// * `UnknownToken` if the ledger does not hold either token
    pub fn create_pair(&self, token_a: Address, token_b: Address) -> Result<Address> {
        let (token0, token1) = canonical_pair(token_a, token_b)?;

        let mut state = self.lock();
        if state.pairs.contains_key(&(token0, token1)) {
            log::debug!("pair {}/{} already registered", token0, token1);
            return Err(DexError::PairAlreadyExists);
        }

        let address = Address::derive(POOL_TAG, state.next_nonce);
        let pool = LiquidityPool::new(
            address,
            token0,
            token1,
            self.config,
            self.ledger.clone(),
            self.events.clone(),
        )?;

        state.next_nonce += 1;
        state.pairs.insert((token0, token1), address);
        state.records.push(PoolRecord { token0, token1, pool: address });
        state.pools.insert(address, Arc::new(pool));

        log::info!("pool {} created for {}/{}", address, token0, token1);
        self.events.emit(PoolEvent::PairCreated { token0, token1, pool: address });

        Ok(address)
    }

    /// Pool address for the pair, `None` if it was never created
    pub fn registry(&self, token_a: Address, token_b: Address) -> Option<Address> {
        let key = canonical_pair(token_a, token_b).ok()?;
        self.lock().pairs.get(&key).copied()
    }

    /// Every pool address in creation order
    pub fn all_pools(&self) -> Vec<Address> {
        self.lock().records.iter().map(|r| r.pool).collect()
    }

    pub fn records(&self) -> Vec<PoolRecord> {
        self.lock().records.clone()
    }

    pub fn pool(&self, address: Address) -> Option<Arc<LiquidityPool>> {
        self.lock().pools.get(&address).cloned()
    }

    pub fn pool_for(&self, token_a: Address, token_b: Address) -> Option<Arc<LiquidityPool>> {
        let address = self.registry(token_a, token_b)?;
        self.pool(address)
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }
}
