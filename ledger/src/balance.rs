//! Balance snapshots and the deltas each ledger call reports.

use bill_types::{Address, AssetClass};
use serde::{Deserialize, Serialize};

/// An account's holding of one asset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub available: u128,
    pub frozen: u128,
}

impl AccountBalance {
    pub fn new(available: u128, frozen: u128) -> Self {
        Self { available, frozen }
    }

    /// Available plus frozen, saturating.
    pub fn total(&self) -> u128 {
        self.available.saturating_add(self.frozen)
    }
}

/// Before/after view of one account touched by a ledger call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChange {
    pub address: Address,
    pub prev: AccountBalance,
    pub current: AccountBalance,
}

/// What a single ledger mutation did, for the receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementDelta {
    pub class: AssetClass,
    pub symbol: String,
    pub changes: Vec<BalanceChange>,
}

impl SettlementDelta {
    pub fn new(class: AssetClass, symbol: impl Into<String>) -> Self {
        Self {
            class,
            symbol: symbol.into(),
            changes: Vec::new(),
        }
    }

    pub fn with_change(
        mut self,
        address: &Address,
        prev: AccountBalance,
        current: AccountBalance,
    ) -> Self {
        self.changes.push(BalanceChange {
            address: address.clone(),
            prev,
            current,
        });
        self
    }

    /// The post-call balance recorded for `address`, if it was touched.
    pub fn current_of(&self, address: &Address) -> Option<AccountBalance> {
        self.changes
            .iter()
            .rev()
            .find(|c| &c.address == address)
            .map(|c| c.current)
    }
}
