//! Nullable asset ledger: in-memory balances for testing.

use bill_ledger::{AccountBalance, AssetError, AssetLedger, SettlementDelta};
use bill_types::{Address, AssetClass};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

type BalanceKey = (AssetClass, String, Address);

/// An in-memory asset ledger.
///
/// Balances start at zero and are seeded with [`NullAssetLedger::mint`].
/// [`NullAssetLedger::fail_after`] makes a later mutation fail, so callers
/// can exercise their compensation paths.
pub struct NullAssetLedger {
    balances: Mutex<BTreeMap<BalanceKey, AccountBalance>>,
    fail_countdown: Mutex<Option<usize>>,
    mutations: Mutex<u64>,
}

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, AssetError> {
    m.lock().map_err(|e| AssetError::Backend(e.to_string()))
}

fn key(class: AssetClass, symbol: &str, address: &Address) -> BalanceKey {
    (class, symbol.to_string(), address.clone())
}

impl NullAssetLedger {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(BTreeMap::new()),
            fail_countdown: Mutex::new(None),
            mutations: Mutex::new(0),
        }
    }

    /// Credit `amount` to `address`'s available balance out of thin air.
    pub fn mint(
        &self,
        class: AssetClass,
        symbol: &str,
        address: &Address,
        amount: u128,
    ) -> Result<(), AssetError> {
        let mut balances = lock(&self.balances)?;
        let entry = balances.entry(key(class, symbol, address)).or_default();
        entry.available = entry
            .available
            .checked_add(amount)
            .ok_or_else(|| AssetError::Overflow(address.clone()))?;
        Ok(())
    }

    /// Balance lookup for assertions; absent accounts read as zero.
    pub fn balance(&self, class: AssetClass, symbol: &str, address: &Address) -> AccountBalance {
        self.get_balance(class, symbol, address).unwrap_or_default()
    }

    /// Let the next `n` mutations succeed, then fail the one after.
    pub fn fail_after(&self, n: usize) {
        if let Ok(mut c) = self.fail_countdown.lock() {
            *c = Some(n);
        }
    }

    /// Number of successful mutations so far.
    pub fn mutation_count(&self) -> u64 {
        self.mutations.lock().map(|m| *m).unwrap_or(0)
    }

    /// Total supply of one asset across every account.
    pub fn supply(&self, class: AssetClass, symbol: &str) -> u128 {
        self.balances
            .lock()
            .map(|b| {
                b.iter()
                    .filter(|((c, s, _), _)| *c == class && s == symbol)
                    .map(|(_, bal)| bal.total())
                    .sum()
            })
            .unwrap_or(0)
    }

    fn check_injected_failure(&self) -> Result<(), AssetError> {
        let mut countdown = lock(&self.fail_countdown)?;
        match *countdown {
            Some(0) => {
                *countdown = None;
                Err(AssetError::Backend("injected failure".into()))
            }
            Some(n) => {
                *countdown = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Apply `f` to the touched accounts under one lock; nothing is written
    /// unless every account update succeeds.
    fn mutate<F>(
        &self,
        class: AssetClass,
        symbol: &str,
        accounts: &[&Address],
        f: F,
    ) -> Result<SettlementDelta, AssetError>
    where
        F: FnOnce(&mut [AccountBalance]) -> Result<(), AssetError>,
    {
        self.check_injected_failure()?;
        let mut balances = lock(&self.balances)?;
        let prev: Vec<AccountBalance> = accounts
            .iter()
            .map(|a| balances.get(&key(class, symbol, a)).copied().unwrap_or_default())
            .collect();
        let mut next = prev.clone();
        f(&mut next)?;

        let mut delta = SettlementDelta::new(class, symbol);
        for ((addr, before), after) in accounts.iter().zip(prev).zip(next) {
            balances.insert(key(class, symbol, addr), after);
            delta = delta.with_change(addr, before, after);
        }
        *lock(&self.mutations)? += 1;
        Ok(delta)
    }
}

impl Default for NullAssetLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn debit_available(
    bal: &mut AccountBalance,
    address: &Address,
    symbol: &str,
    amount: u128,
) -> Result<(), AssetError> {
    bal.available = bal
        .available
        .checked_sub(amount)
        .ok_or_else(|| AssetError::InsufficientAvailable {
            address: address.clone(),
            symbol: symbol.to_string(),
            needed: amount,
            available: bal.available,
        })?;
    Ok(())
}

fn debit_frozen(
    bal: &mut AccountBalance,
    address: &Address,
    symbol: &str,
    amount: u128,
) -> Result<(), AssetError> {
    bal.frozen = bal
        .frozen
        .checked_sub(amount)
        .ok_or_else(|| AssetError::InsufficientFrozen {
            address: address.clone(),
            symbol: symbol.to_string(),
            needed: amount,
            frozen: bal.frozen,
        })?;
    Ok(())
}

fn credit(slot: &mut u128, address: &Address, amount: u128) -> Result<(), AssetError> {
    *slot = slot
        .checked_add(amount)
        .ok_or_else(|| AssetError::Overflow(address.clone()))?;
    Ok(())
}

impl AssetLedger for NullAssetLedger {
    fn get_balance(
        &self,
        class: AssetClass,
        symbol: &str,
        address: &Address,
    ) -> Result<AccountBalance, AssetError> {
        Ok(lock(&self.balances)?
            .get(&key(class, symbol, address))
            .copied()
            .unwrap_or_default())
    }

    fn transfer(
        &self,
        class: AssetClass,
        symbol: &str,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<SettlementDelta, AssetError> {
        if from == to {
            return self.mutate(class, symbol, &[from], |b| {
                let mut probe = b[0];
                debit_available(&mut probe, from, symbol, amount)
            });
        }
        self.mutate(class, symbol, &[from, to], |b| {
            debit_available(&mut b[0], from, symbol, amount)?;
            credit(&mut b[1].available, to, amount)
        })
    }

    fn freeze(
        &self,
        class: AssetClass,
        symbol: &str,
        address: &Address,
        amount: u128,
    ) -> Result<SettlementDelta, AssetError> {
        self.mutate(class, symbol, &[address], |b| {
            debit_available(&mut b[0], address, symbol, amount)?;
            credit(&mut b[0].frozen, address, amount)
        })
    }

    fn unfreeze(
        &self,
        class: AssetClass,
        symbol: &str,
        address: &Address,
        amount: u128,
    ) -> Result<SettlementDelta, AssetError> {
        self.mutate(class, symbol, &[address], |b| {
            debit_frozen(&mut b[0], address, symbol, amount)?;
            credit(&mut b[0].available, address, amount)
        })
    }

    fn transfer_frozen(
        &self,
        class: AssetClass,
        symbol: &str,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<SettlementDelta, AssetError> {
        if from == to {
            return self.mutate(class, symbol, &[from], |b| {
                debit_frozen(&mut b[0], from, symbol, amount)?;
                credit(&mut b[0].available, from, amount)
            });
        }
        self.mutate(class, symbol, &[from, to], |b| {
            debit_frozen(&mut b[0], from, symbol, amount)?;
            credit(&mut b[1].available, to, amount)
        })
    }
}
