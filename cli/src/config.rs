//! Operator configuration: pool parameters, test tokens and named accounts

use anyhow::{Context, Result};
use pairswap_common::{Address, PoolConfig, MAX_TAG_LEN};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

/// Address tag for accounts declared without an explicit address
pub const ACCOUNT_TAG: &[u8] = b"pairswap/account";
const _: () = assert!(ACCOUNT_TAG.len() <= MAX_TAG_LEN);

/// Default state file location
pub const DEFAULT_STATE_PATH: &str = "~/.config/pairswap/state.json";

/// Contents of the `--config` TOML file
///
/// ```toml
/// [pool]
/// fee_numerator = 997
/// fee_denominator = 1000
/// share_decimals = 6
///
/// [[tokens]]
/// name = "TokenA"
/// symbol = "TKA"
/// decimals = 18
///
/// [[accounts]]
/// name = "alice"
/// balances = { TKA = "1000" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub pool: PoolConfig,
    pub tokens: Vec<TokenSpec>,
    pub accounts: Vec<AccountSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenSpec {
    pub name: String,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountSpec {
    pub name: String,
    /// base58; derived from the account's position when absent
    pub address: Option<Address>,
    /// Token symbol -> whole-unit amount minted at `init`
    #[serde(default)]
    pub balances: BTreeMap<String, String>,
}

fn default_decimals() -> u8 {
    18
}

impl CliConfig {
    /// Read and validate the config file; built-in defaults when `path` is `None`
    pub fn load(path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let path = expand_path(path)?;
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::parse(&text).with_context(|| format!("Invalid config file: {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.pool.validate()?;

        let mut symbols = BTreeSet::new();
        for token in &self.tokens {
            if token.symbol.is_empty() {
                anyhow::bail!("token {:?} has an empty symbol", token.name);
            }
            if !symbols.insert(token.symbol.to_ascii_uppercase()) {
                anyhow::bail!("duplicate token symbol {}", token.symbol);
            }
        }

        let mut names = BTreeSet::new();
        for account in &self.accounts {
            if !names.insert(account.name.as_str()) {
                anyhow::bail!("duplicate account name {}", account.name);
            }
            for symbol in account.balances.keys() {
                if !symbols.contains(&symbol.to_ascii_uppercase()) {
                    anyhow::bail!("account {} funds unknown token {}", account.name, symbol);
                }
            }
        }
        Ok(())
    }

    /// Name -> address for every declared account
    pub fn account_addresses(&self) -> BTreeMap<String, Address> {
        self.accounts
            .iter()
            .enumerate()
            .map(|(i, account)| {
                let address = account.address.unwrap_or_else(|| Address::derive(ACCOUNT_TAG, i as u64));
                (account.name.clone(), address)
            })
            .collect()
    }
}

/// Expand `~` and environment variables in a path argument
pub fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).with_context(|| format!("Failed to expand path: {}", path))?;
    Ok(PathBuf::from(expanded.as_ref()))
}
