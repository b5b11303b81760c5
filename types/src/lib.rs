//! Fundamental types for the bill settlement engine.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! addresses, hashes, timestamps, identities, bill status, the Bill record itself
//! and the credit-registry entry it depends on.

pub mod address;
pub mod bill;
pub mod credit;
pub mod error;
pub mod hash;
pub mod params;
pub mod state;
pub mod time;

pub use address::Address;
pub use bill::{Bill, DpdtToken};
pub use credit::CreditToken;
pub use error::BillError;
pub use hash::TxHash;
pub use params::{DEFAULT_OVERDUE_GRACE_PERIOD, DEFAULT_OVERDUE_LIMIT, ONE_DAY_SECS, RATE_SCALE};
pub use state::{AssetClass, BillStatus, Identity};
pub use time::Timestamp;
