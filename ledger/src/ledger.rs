//! The asset ledger trait.
//!
//! Every method names the asset by class and symbol. A failed call leaves
//! balances unchanged; compensating a sequence of calls is the caller's job.

use crate::{AccountBalance, AssetError, SettlementDelta};
use bill_types::{Address, AssetClass};

pub trait AssetLedger {
    fn get_balance(
        &self,
        class: AssetClass,
        symbol: &str,
        address: &Address,
    ) -> Result<AccountBalance, AssetError>;

    /// Move `amount` of available balance from `from` to `to`.
    fn transfer(
        &self,
        class: AssetClass,
        symbol: &str,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<SettlementDelta, AssetError>;

    /// Move `amount` from available to frozen on `address`.
    fn freeze(
        &self,
        class: AssetClass,
        symbol: &str,
        address: &Address,
        amount: u128,
    ) -> Result<SettlementDelta, AssetError>;

    /// Move `amount` from frozen back to available on `address`.
    fn unfreeze(
        &self,
        class: AssetClass,
        symbol: &str,
        address: &Address,
        amount: u128,
    ) -> Result<SettlementDelta, AssetError>;

    /// Debit `from`'s frozen balance and credit `to`'s available balance.
    fn transfer_frozen(
        &self,
        class: AssetClass,
        symbol: &str,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<SettlementDelta, AssetError>;

    /// Fail with [`AssetError::InsufficientAvailable`] unless `address` holds
    /// at least `needed` available.
    fn require_available(
        &self,
        class: AssetClass,
        symbol: &str,
        address: &Address,
        needed: u128,
    ) -> Result<AccountBalance, AssetError> {
        let balance = self.get_balance(class, symbol, address)?;
        if balance.available < needed {
            return Err(AssetError::InsufficientAvailable {
                address: address.clone(),
                symbol: symbol.to_string(),
                needed,
                available: balance.available,
            });
        }
        Ok(balance)
    }

    /// Fail with [`AssetError::InsufficientFrozen`] unless `address` holds
    /// at least `needed` frozen.
    fn require_frozen(
        &self,
        class: AssetClass,
        symbol: &str,
        address: &Address,
        needed: u128,
    ) -> Result<AccountBalance, AssetError> {
        let balance = self.get_balance(class, symbol, address)?;
        if balance.frozen < needed {
            return Err(AssetError::InsufficientFrozen {
                address: address.clone(),
                symbol: symbol.to_string(),
                needed,
                frozen: balance.frozen,
            });
        }
        Ok(balance)
    }
}
