//! Compensating journal over asset-ledger mutations.
//!
//! An action may touch the ledger several times. Each successful call is
//! recorded; if the action later fails, [`LedgerJournal::rollback`] applies
//! the inverse calls in reverse order so the ledger ends where it started.
//!
//! # Usage
//!
//! ```ignore
//! let mut journal = LedgerJournal::new(&ledger);
//! journal.freeze(AssetClass::Token, "CREDIT.A", &core, 600)?;
//! journal.transfer(AssetClass::Coins, "token.CCNY", &funder, &supplier, 598)?;
//! let deltas = journal.commit();
//! ```
//!
//! If the journal is dropped without calling [`LedgerJournal::commit`], every
//! recorded mutation is compensated.

use tracing::error;

use bill_ledger::{AssetError, AssetLedger, SettlementDelta};
use bill_types::{Address, AssetClass};

#[derive(Clone, Debug)]
enum Entry {
    Transfer { from: Address, to: Address },
    Freeze { addr: Address },
    Unfreeze { addr: Address },
    TransferFrozen { from: Address, to: Address },
}

#[derive(Clone, Debug)]
struct Applied {
    class: AssetClass,
    symbol: String,
    amount: u128,
    entry: Entry,
}

pub struct LedgerJournal<'a, L: AssetLedger> {
    ledger: &'a L,
    applied: Vec<Applied>,
    deltas: Vec<SettlementDelta>,
}

impl<'a, L: AssetLedger> LedgerJournal<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self {
            ledger,
            applied: Vec::new(),
            deltas: Vec::new(),
        }
    }

    fn record(
        &mut self,
        class: AssetClass,
        symbol: &str,
        amount: u128,
        entry: Entry,
        delta: SettlementDelta,
    ) {
        self.applied.push(Applied {
            class,
            symbol: symbol.to_string(),
            amount,
            entry,
        });
        self.deltas.push(delta);
    }

    pub fn transfer(
        &mut self,
        class: AssetClass,
        symbol: &str,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), AssetError> {
        let delta = self.ledger.transfer(class, symbol, from, to, amount)?;
        let entry = Entry::Transfer { from: from.clone(), to: to.clone() };
        self.record(class, symbol, amount, entry, delta);
        Ok(())
    }

    pub fn freeze(
        &mut self,
        class: AssetClass,
        symbol: &str,
        addr: &Address,
        amount: u128,
    ) -> Result<(), AssetError> {
        let delta = self.ledger.freeze(class, symbol, addr, amount)?;
        self.record(class, symbol, amount, Entry::Freeze { addr: addr.clone() }, delta);
        Ok(())
    }

    pub fn unfreeze(
        &mut self,
        class: AssetClass,
        symbol: &str,
        addr: &Address,
        amount: u128,
    ) -> Result<(), AssetError> {
        let delta = self.ledger.unfreeze(class, symbol, addr, amount)?;
        self.record(class, symbol, amount, Entry::Unfreeze { addr: addr.clone() }, delta);
        Ok(())
    }

    pub fn transfer_frozen(
        &mut self,
        class: AssetClass,
        symbol: &str,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), AssetError> {
        let delta = self.ledger.transfer_frozen(class, symbol, from, to, amount)?;
        let entry = Entry::TransferFrozen { from: from.clone(), to: to.clone() };
        self.record(class, symbol, amount, entry, delta);
        Ok(())
    }

    /// Number of mutations applied so far.
    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    /// Keep every mutation and hand back the deltas for the receipt.
    pub fn commit(mut self) -> Vec<SettlementDelta> {
        self.applied.clear();
        std::mem::take(&mut self.deltas)
    }

    /// Undo every mutation, newest first.
    ///
    /// Returns the number of inverse calls that failed; each failure is logged.
    pub fn rollback(mut self) -> usize {
        self.compensate()
    }

    fn compensate(&mut self) -> usize {
        let ledger = self.ledger;
        let mut failures = 0;
        for a in self.applied.drain(..).rev() {
            let (class, symbol, amount) = (a.class, a.symbol.as_str(), a.amount);
            let result = match &a.entry {
                Entry::Transfer { from, to } => {
                    ledger.transfer(class, symbol, to, from, amount).map(|_| ())
                }
                Entry::Freeze { addr } => ledger.unfreeze(class, symbol, addr, amount).map(|_| ()),
                Entry::Unfreeze { addr } => ledger.freeze(class, symbol, addr, amount).map(|_| ()),
                Entry::TransferFrozen { from, to } => ledger
                    .transfer(class, symbol, to, from, amount)
                    .and_then(|_| ledger.freeze(class, symbol, from, amount))
                    .map(|_| ()),
            };
            if let Err(e) = result {
                failures += 1;
                error!(%symbol, amount, entry = ?a.entry, error = %e, "ledger compensation failed");
            }
        }
        self.deltas.clear();
        failures
    }
}

impl<L: AssetLedger> Drop for LedgerJournal<'_, L> {
    fn drop(&mut self) {
        if !self.applied.is_empty() {
            self.compensate();
        }
    }
}
