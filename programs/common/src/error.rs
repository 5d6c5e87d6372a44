//! Error taxonomy shared by the registry, pools and token ledger

use crate::Address;
use amm_model::AmmError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DexError>;

/// Every failure is terminal for the operation and leaves state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DexError {
    /// Same token twice, or the null address
    #[error("Invalid pair")]
    InvalidPair,

    #[error("Pool already exists")]
    PairAlreadyExists,

    /// Estimate or swap against a pool with no reserves
    #[error("Pool is empty")]
    EmptyPool,

    #[error("Insufficient allowance")]
    InsufficientAllowance,

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Insufficient shares")]
    InsufficientShares,

    #[error("Amount must be greater than zero")]
    ZeroAmount,

    /// Deposit too small to mint a single share unit
    #[error("Insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// Swap input too small to buy anything
    #[error("Insufficient output amount")]
    InsufficientOutputAmount,

    #[error("Slippage exceeded: output {actual} below minimum {minimum}")]
    SlippageExceeded { minimum: u128, actual: u128 },

    #[error("Unknown token {0}")]
    UnknownToken(Address),

    #[error("Unknown pool {0}")]
    UnknownPool(Address),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Arithmetic overflow")]
    Overflow,
}

impl From<AmmError> for DexError {
    fn from(err: AmmError) -> Self {
        match err {
            AmmError::EmptyReserves => DexError::EmptyPool,
            AmmError::ZeroAmount => DexError::ZeroAmount,
            AmmError::InvalidFee => DexError::InvalidConfig("fee must be a fraction in (0, 1]".into()),
            AmmError::InsufficientLiquidityMinted => DexError::InsufficientLiquidityMinted,
            AmmError::InsufficientShares => DexError::InsufficientShares,
            AmmError::Overflow => DexError::Overflow,
        }
    }
}
