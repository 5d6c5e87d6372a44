//! Fungible token collaborator
//!
//! Pools never touch balances directly: every token movement goes through
//! `TokenLedger::settle`, which applies a batch of transfers all-or-nothing.
//! `TokenBank` is the in-memory ledger used by the CLI and the tests.

use crate::{Address, DexError, Result, MAX_TAG_LEN};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Address tag for tokens created by a `TokenBank`
pub const TOKEN_TAG: &[u8] = b"pairswap/token";
const _: () = assert!(TOKEN_TAG.len() <= MAX_TAG_LEN);

/// Allowance that `transfer_from` never decrements
pub const UNLIMITED_ALLOWANCE: u128 = u128::MAX;

/// One token movement.
///
/// With `spender` set, the movement is a `transferFrom`: `spender` must hold
/// an allowance from `from` covering `amount`, which is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub amount: u128,
    pub spender: Option<Address>,
}

impl Transfer {
    /// `spender` pulls `amount` of `token` from `owner` into itself
    pub fn pull(token: Address, owner: Address, spender: Address, amount: u128) -> Self {
        Self { token, from: owner, to: spender, amount, spender: Some(spender) }
    }

    /// `from` pays `amount` of `token` to `to`
    pub fn push(token: Address, from: Address, to: Address, amount: u128) -> Self {
        Self { token, from, to, amount, spender: None }
    }
}

/// What a pool needs from the token side
pub trait TokenLedger: Send + Sync {
    fn decimals(&self, token: Address) -> Result<u8>;

    fn balance_of(&self, token: Address, account: Address) -> u128;

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> u128;

    /// Apply every transfer or none of them.
    ///
    /// Fails with `InsufficientAllowance` / `InsufficientBalance` for the
    /// first transfer that cannot be covered, `UnknownToken` for a token the
    /// ledger does not hold.
    fn settle(&self, transfers: &[Transfer]) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct TokenBook {
    total_supply: u128,
    balances: BTreeMap<Address, u128>,
    /// owner -> spender -> remaining allowance
    allowances: BTreeMap<Address, BTreeMap<Address, u128>>,
}

impl TokenBook {
    fn balance(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    fn set_balance(&mut self, account: Address, amount: u128) {
        if amount == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, amount);
        }
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: u128) {
        let spenders = self.allowances.entry(owner).or_default();
        if amount == 0 {
            spenders.remove(&spender);
            if spenders.is_empty() {
                self.allowances.remove(&owner);
            }
        } else {
            spenders.insert(spender, amount);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Token {
    metadata: TokenMetadata,
    book: TokenBook,
}

/// Serializable image of a `TokenBank`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankSnapshot {
    next_nonce: u64,
    tokens: BTreeMap<Address, Token>,
}

/// In-memory token ledger holding any number of tokens.
///
/// A single mutex covers every book, so a `settle` batch spanning two
/// tokens commits as one step.
#[derive(Debug, Default)]
pub struct TokenBank {
    state: Mutex<BankSnapshot>,
}

impl TokenBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restore(snapshot: BankSnapshot) -> Self {
        Self { state: Mutex::new(snapshot) }
    }

    pub fn snapshot(&self) -> BankSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, BankSnapshot> {
        // Books are only written after a batch fully validates
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new token with zero supply
    pub fn create_token(&self, name: &str, symbol: &str, decimals: u8) -> Address {
        let mut state = self.lock();
        let address = Address::derive(TOKEN_TAG, state.next_nonce);
        state.next_nonce += 1;
        state.tokens.insert(
            address,
            Token {
                metadata: TokenMetadata {
                    name: name.to_string(),
                    symbol: symbol.to_string(),
                    decimals,
                },
                book: TokenBook::default(),
            },
        );
        log::info!("token {} ({}) created at {} with {} decimals", name, symbol, address, decimals);
        address
    }

    pub fn metadata(&self, token: Address) -> Result<TokenMetadata> {
        self.lock()
            .tokens
            .get(&token)
            .map(|t| t.metadata.clone())
            .ok_or(DexError::UnknownToken(token))
    }

    /// All tokens in address order
    pub fn tokens(&self) -> Vec<(Address, TokenMetadata)> {
        self.lock()
            .tokens
            .iter()
            .map(|(address, t)| (*address, t.metadata.clone()))
            .collect()
    }

    pub fn find_by_symbol(&self, symbol: &str) -> Option<Address> {
        self.lock()
            .tokens
            .iter()
            .find(|(_, t)| t.metadata.symbol.eq_ignore_ascii_case(symbol))
            .map(|(address, _)| *address)
    }

    pub fn total_supply(&self, token: Address) -> Result<u128> {
        self.lock()
            .tokens
            .get(&token)
            .map(|t| t.book.total_supply)
            .ok_or(DexError::UnknownToken(token))
    }

    /// Faucet: create `amount` new units for `to`
    pub fn mint(&self, token: Address, to: Address, amount: u128) -> Result<()> {
        if to.is_zero() {
            return Err(DexError::InvalidAmount("cannot mint to the zero address".into()));
        }
        let mut state = self.lock();
        let entry = state.tokens.get_mut(&token).ok_or(DexError::UnknownToken(token))?;

        let supply = entry.book.total_supply.checked_add(amount).ok_or(DexError::Overflow)?;
        let balance = entry.book.balance(&to).checked_add(amount).ok_or(DexError::Overflow)?;
        entry.book.total_supply = supply;
        entry.book.set_balance(to, balance);

        log::info!("minted {} of {} to {}", amount, entry.metadata.symbol, to);
        Ok(())
    }

    /// Set `spender`'s allowance over `owner`'s balance (overwrites)
    pub fn approve(&self, token: Address, owner: Address, spender: Address, amount: u128) -> Result<()> {
        let mut state = self.lock();
        let entry = state.tokens.get_mut(&token).ok_or(DexError::UnknownToken(token))?;
        entry.book.set_allowance(owner, spender, amount);
        log::debug!("{} approved {} of {} for {}", owner, amount, entry.metadata.symbol, spender);
        Ok(())
    }

    pub fn transfer(&self, token: Address, from: Address, to: Address, amount: u128) -> Result<()> {
        self.settle(&[Transfer::push(token, from, to, amount)])
    }

    pub fn transfer_from(
        &self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<()> {
        self.settle(&[Transfer { token, from, to, amount, spender: Some(spender) }])
    }
}

impl TokenLedger for TokenBank {
    fn decimals(&self, token: Address) -> Result<u8> {
        self.lock()
            .tokens
            .get(&token)
            .map(|t| t.metadata.decimals)
            .ok_or(DexError::UnknownToken(token))
    }

    fn balance_of(&self, token: Address, account: Address) -> u128 {
        self.lock().tokens.get(&token).map_or(0, |t| t.book.balance(&account))
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> u128 {
        self.lock().tokens.get(&token).map_or(0, |t| t.book.allowance(&owner, &spender))
    }

    fn settle(&self, transfers: &[Transfer]) -> Result<()> {
        let mut state = self.lock();

        // Stage every touched balance and allowance, then write back only if
        // the whole batch is covered.
        let mut balances: HashMap<(Address, Address), u128> = HashMap::new();
        let mut allowances: HashMap<(Address, Address, Address), u128> = HashMap::new();

        for transfer in transfers {
            let token = state
                .tokens
                .get(&transfer.token)
                .ok_or(DexError::UnknownToken(transfer.token))?;

            if let Some(spender) = transfer.spender {
                let key = (transfer.token, transfer.from, spender);
                let current = *allowances
                    .entry(key)
                    .or_insert_with(|| token.book.allowance(&transfer.from, &spender));
                if current < transfer.amount {
                    return Err(DexError::InsufficientAllowance);
                }
                if current != UNLIMITED_ALLOWANCE {
                    allowances.insert(key, current - transfer.amount);
                }
            }

            let from_key = (transfer.token, transfer.from);
            let from_balance = *balances
                .entry(from_key)
                .or_insert_with(|| token.book.balance(&transfer.from));
            if from_balance < transfer.amount {
                return Err(DexError::InsufficientBalance);
            }
            balances.insert(from_key, from_balance - transfer.amount);

            let to_key = (transfer.token, transfer.to);
            let to_balance = *balances
                .entry(to_key)
                .or_insert_with(|| token.book.balance(&transfer.to));
            // Bounded by total supply, which fits in u128
            balances.insert(to_key, to_balance + transfer.amount);
        }

        for ((token, account), amount) in balances {
            if let Some(entry) = state.tokens.get_mut(&token) {
                entry.book.set_balance(account, amount);
            }
        }
        for ((token, owner, spender), amount) in allowances {
            if let Some(entry) = state.tokens.get_mut(&token) {
                entry.book.set_allowance(owner, spender, amount);
            }
        }
        Ok(())
    }
}
