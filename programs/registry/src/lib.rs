//! Pair registry: one constant-product pool per unordered token pair

pub mod registry;

pub use registry::{canonical_pair, PairRegistry, PoolRecord, RegistrySnapshot, POOL_TAG};
