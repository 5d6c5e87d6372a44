//! Shared types for the pairswap registry and pools
//!
//! - `Address`: 32-byte identifiers for tokens, pools and accounts
//! - `DexError`: every failure an operation can surface
//! - `PoolConfig`: fee and share precision handed to every pool
//! - `PoolEvent` / `EventSink`: notifications on committed state changes
//! - `TokenLedger` / `TokenBank`: the fungible-token collaborator

pub mod address;
pub mod config;
pub mod error;
pub mod events;
pub mod math;
pub mod token;

pub use address::{Address, ParseAddressError, MAX_TAG_LEN};
pub use config::PoolConfig;
pub use error::{DexError, Result};
pub use events::{EventLog, EventSink, NullSink, PoolEvent};
pub use token::{BankSnapshot, TokenBank, TokenLedger, TokenMetadata, Transfer, UNLIMITED_ALLOWANCE};
