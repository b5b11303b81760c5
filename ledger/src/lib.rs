//! Asset ledger abstraction.
//!
//! The host chain owns balances. The settlement engine sees them only
//! through [`AssetLedger`]: read a balance, move available funds, and
//! lock or release them in the frozen sub-balance.

pub mod balance;
pub mod error;
pub mod ledger;

pub use balance::{AccountBalance, BalanceChange, SettlementDelta};
pub use error::AssetError;
pub use ledger::AssetLedger;
