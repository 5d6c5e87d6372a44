//! 32-byte addresses rendered as base58

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Longest tag `Address::derive` keeps intact
pub const MAX_TAG_LEN: usize = 24;

/// Identifier of a token, pool or account.
///
/// Ordered by byte comparison; this order canonicalizes token pairs.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 32]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAddressError {
    #[error("invalid base58 address: {0}")]
    Encoding(String),
    #[error("address must be 32 bytes, got {0}")]
    Length(usize),
}

impl Address {
    /// Null sentinel; never a valid token or pool
    pub const ZERO: Address = Address([0; 32]);

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Deterministic address for the `nonce`-th object of a kind.
    ///
    /// The first 24 bytes carry `tag` zero-padded, the last 8 carry the nonce
    /// big-endian, so distinct `(tag, nonce)` never collide. Tags longer than
    /// `MAX_TAG_LEN` are rejected in debug builds.
    pub fn derive(tag: &[u8], nonce: u64) -> Self {
        debug_assert!(tag.len() <= MAX_TAG_LEN, "address tag longer than {} bytes", MAX_TAG_LEN);
        let mut bytes = [0u8; 32];
        let len = tag.len().min(MAX_TAG_LEN);
        bytes[..len].copy_from_slice(&tag[..len]);
        bytes[MAX_TAG_LEN..].copy_from_slice(&nonce.to_be_bytes());
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 32]
    }

    /// First and last 4 characters, for console output
    pub fn short(&self) -> String {
        let s = self.to_string();
        if s.len() <= 12 {
            return s;
        }
        format!("{}...{}", &s[..4], &s[s.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| ParseAddressError::Encoding(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| ParseAddressError::Length(v.len()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = ParseAddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}
