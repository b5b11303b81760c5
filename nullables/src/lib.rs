//! Nullable infrastructure for deterministic testing.
//!
//! The settlement engine never owns balances or storage: the host ledger
//! provides both. This crate provides stand-ins that:
//! - Keep everything in memory
//! - Can be seeded and inspected programmatically
//! - Can be told to fail, to exercise rollback paths
//!
//! Usage: hand a `NullStore` and a `NullAssetLedger` to the engine in tests
//! and in the script runner.

pub mod asset;
pub mod clock;
pub mod store;

pub use asset::NullAssetLedger;
pub use clock::NullClock;
pub use store::NullStore;
