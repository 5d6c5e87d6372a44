//! Kani harnesses for the constant product model
//!
//! Run with: cargo kani -p proofs-kani

#![cfg_attr(not(kani), allow(dead_code))]

#[cfg(kani)]
mod amm;
