//! Constant product AMM math (x·y=k) - re-exported from amm_model
//!
//! Estimators and mutating calls both price through `quote_swap`, so a quote
//! and the trade executed against the same reserves always agree.

pub use amm_model::{
    bootstrap_shares, optimal_deposit, quote_equivalent, quote_swap, withdraw_amounts, AmmError,
    Deposit, Fee, SwapQuote,
};
