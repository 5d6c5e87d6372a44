//! Persisted exchange state: token bank, registry with its pools, account names

use anyhow::{Context, Result};
use pairswap_amm::LiquidityPool;
use pairswap_common::math::parse_units;
use pairswap_common::{Address, BankSnapshot, EventLog, PoolEvent, TokenBank, TokenLedger};
use pairswap_registry::{PairRegistry, RegistrySnapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::CliConfig;

/// On-disk layout of the state file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    /// RFC 3339 timestamp of the last save
    pub saved_at: String,
    pub bank: BankSnapshot,
    pub registry: RegistrySnapshot,
    pub accounts: BTreeMap<String, Address>,
}

/// Live objects rebuilt from a state file for one command
pub struct Session {
    pub bank: Arc<TokenBank>,
    pub events: Arc<EventLog>,
    pub registry: PairRegistry,
    pub accounts: BTreeMap<String, Address>,
}

impl Session {
    /// Fresh state from `config`: create the tokens, name the accounts and
    /// mint each account's starting balances
    pub fn init(config: &CliConfig) -> Result<Self> {
        let bank = Arc::new(TokenBank::new());
        let events = Arc::new(EventLog::new());
        let registry = PairRegistry::new(config.pool, bank.clone(), events.clone())?;

        for token in &config.tokens {
            bank.create_token(&token.name, &token.symbol, token.decimals);
        }

        let accounts = config.account_addresses();
        for spec in &config.accounts {
            let owner = accounts[&spec.name];
            for (symbol, amount) in &spec.balances {
                let token = bank
                    .find_by_symbol(symbol)
                    .with_context(|| format!("Unknown token symbol {}", symbol))?;
                let decimals = bank.decimals(token)?;
                let units = parse_units(amount, decimals)
                    .with_context(|| format!("Invalid starting balance for {}", spec.name))?;
                bank.mint(token, owner, units)?;
            }
        }

        Ok(Self { bank, events, registry, accounts })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| {
            format!("Failed to read state file: {} (run `pairswap init` first)", path.display())
        })?;
        let file: StateFile = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;
        log::debug!("loaded state saved at {}", file.saved_at);

        let bank = Arc::new(TokenBank::restore(file.bank));
        let events = Arc::new(EventLog::new());
        let registry = PairRegistry::restore(file.registry, bank.clone(), events.clone())
            .context("State file holds an inconsistent registry")?;

        Ok(Self { bank, events, registry, accounts: file.accounts })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = StateFile {
            saved_at: chrono::Utc::now().to_rfc3339(),
            bank: self.bank.snapshot(),
            registry: self.registry.snapshot(),
            accounts: self.accounts.clone(),
        };
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        let text = serde_json::to_string_pretty(&file)?;
        fs::write(path, text).with_context(|| format!("Failed to write state file: {}", path.display()))?;
        log::debug!("state saved to {}", path.display());
        Ok(())
    }

    /// Events emitted since the session was opened
    pub fn drain_events(&self) -> Vec<PoolEvent> {
        self.events.drain()
    }

    /// Token by symbol (case-insensitive) or base58 address
    pub fn resolve_token(&self, name: &str) -> Result<Address> {
        if let Some(token) = self.bank.find_by_symbol(name) {
            return Ok(token);
        }
        let address: Address = name.parse().with_context(|| format!("Unknown token: {}", name))?;
        self.bank.metadata(address)?;
        Ok(address)
    }

    /// Account by configured name or base58 address
    pub fn resolve_account(&self, name: &str) -> Result<Address> {
        if let Some(address) = self.accounts.get(name) {
            return Ok(*address);
        }
        name.parse().with_context(|| format!("Unknown account: {}", name))
    }

    /// Pool by base58 address or by pair, written `TKA/TKB`
    pub fn resolve_pool(&self, name: &str) -> Result<Arc<LiquidityPool>> {
        let address = match name.split_once('/') {
            Some((a, b)) => {
                let (a, b) = (self.resolve_token(a)?, self.resolve_token(b)?);
                self.registry
                    .registry(a, b)
                    .with_context(|| format!("No pool for pair {}", name))?
            }
            None => name
                .parse::<Address>()
                .with_context(|| format!("Unknown pool: {}", name))?,
        };
        self.registry
            .pool(address)
            .with_context(|| format!("Unknown pool: {}", address))
    }

    /// Display name for an address: account name, token symbol or short form
    pub fn label(&self, address: Address) -> String {
        if let Some((name, _)) = self.accounts.iter().find(|(_, a)| **a == address) {
            return name.clone();
        }
        if let Ok(metadata) = self.bank.metadata(address) {
            return metadata.symbol;
        }
        address.short()
    }

    pub fn symbol(&self, token: Address) -> String {
        self.bank.metadata(token).map(|m| m.symbol).unwrap_or_else(|_| token.short())
    }

    pub fn decimals(&self, token: Address) -> Result<u8> {
        Ok(self.bank.decimals(token)?)
    }

    /// Parse a whole-unit amount of `token`
    pub fn parse_amount(&self, token: Address, amount: &str) -> Result<u128> {
        let decimals = self.decimals(token)?;
        parse_units(amount, decimals).with_context(|| format!("Invalid {} amount: {}", self.symbol(token), amount))
    }
}

/// State file path from `--state`, `~` expanded
pub fn state_path(arg: &str) -> Result<PathBuf> {
    crate::config::expand_path(arg)
}
