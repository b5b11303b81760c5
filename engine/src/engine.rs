//! Core settlement engine.

use tracing::{debug, warn};

use bill_interest::{BillRepayMethod, RepayInfo, RepaymentMethod};
use bill_ledger::AssetLedger;
use bill_store::{FinanceStore, HandshakeKind, PendingHandshake, StoreError};
use bill_types::{Address, Bill, BillStatus, CreditToken, Identity, Timestamp, TxHash};

use crate::action::FinanceAction;
use crate::config::EngineConfig;
use crate::context::TxContext;
use crate::journal::LedgerJournal;
use crate::receipt::Receipt;
use crate::FinanceError;

/// The bill settlement engine.
///
/// Owns no state of its own: bills, credits and handshakes live in the
/// store, balances live in the asset ledger. Every action either commits
/// all of its ledger and record effects or none of them.
pub struct FinanceEngine<S, L, M = BillRepayMethod> {
    store: S,
    ledger: L,
    config: EngineConfig,
    repay_method: M,
}

impl<S: FinanceStore, L: AssetLedger> FinanceEngine<S, L, BillRepayMethod> {
    pub fn new(store: S, ledger: L, config: EngineConfig) -> Self {
        Self::with_repay_method(store, ledger, config, BillRepayMethod)
    }
}

impl<S: FinanceStore, L: AssetLedger, M: RepaymentMethod> FinanceEngine<S, L, M> {
    pub fn with_repay_method(store: S, ledger: L, config: EngineConfig, repay_method: M) -> Self {
        Self {
            store,
            ledger,
            config,
            repay_method,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn repay_method(&self) -> &M {
        &self.repay_method
    }

    /// Execute one action carried by the transaction described in `ctx`.
    ///
    /// On error, every ledger mutation the action made is compensated before
    /// the error is returned, and no record has been written.
    pub fn execute(&self, ctx: &TxContext, action: FinanceAction) -> Result<Receipt, FinanceError> {
        let kind = action.kind();
        debug!(action = kind.name(), tx = %ctx.tx_hash, from = %ctx.from, "executing action");

        let mut journal = LedgerJournal::new(&self.ledger);
        let result = match action {
            FinanceAction::AddCreditToken(a) => self.add_credit_token(ctx, &mut journal, a),
            FinanceAction::DepositAsset(a) => self.deposit_asset(ctx, a),
            FinanceAction::WithdrawlAsset(a) => self.withdrawl_asset(ctx, a),
            FinanceAction::TransferCoins(a) => self.transfer_coins(ctx, &mut journal, a),
            FinanceAction::CreateBill(a) => self.create_bill(ctx, a),
            FinanceAction::ReleaseBill(a) => self.release_bill(ctx, &mut journal, a),
            FinanceAction::UnReleaseBill(a) => self.unrelease_bill(ctx, &mut journal, a),
            FinanceAction::ApplyForFinancing(a) => self.apply_for_financing(ctx, &mut journal, a),
            FinanceAction::UnApplyForFinancing(a) => {
                self.unapply_for_financing(ctx, &mut journal, a)
            }
            FinanceAction::ConfirmFinancing(a) => self.confirm_financing(ctx, &mut journal, a),
            FinanceAction::CashBill(a) => self.cash_bill(ctx, &mut journal, a),
            FinanceAction::RepayBill(a) => self.repay_bill(ctx, &mut journal, a),
            FinanceAction::ReportBroken(a) => self.report_broken(ctx, a),
            FinanceAction::DeliverBill(a) => self.deliver_bill(ctx, &mut journal, a),
            FinanceAction::UnDeliverBill(a) => self.undeliver_bill(ctx, &mut journal, a),
            FinanceAction::ConfirmDeliverBill(a) => self.confirm_deliver_bill(ctx, &mut journal, a),
            FinanceAction::SplitBill(a) => self.split_bill(ctx, &mut journal, a),
            FinanceAction::UnSplitBill(a) => self.unsplit_bill(ctx, &mut journal, a),
            FinanceAction::ConfirmSplitBill(a) => self.confirm_split_bill(ctx, &mut journal, a),
        };

        match result {
            Ok(mut receipt) => {
                receipt.deltas = journal.commit();
                Ok(receipt)
            }
            Err(e) => {
                if !journal.is_empty() {
                    warn!(
                        action = kind.name(),
                        mutations = journal.len(),
                        error = %e,
                        "rolling back ledger effects"
                    );
                }
                journal.rollback();
                Err(e)
            }
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn bill(&self, id: &str) -> Result<Bill, FinanceError> {
        self.load_bill(id)
    }

    pub fn credit(&self, symbol: &str) -> Result<CreditToken, FinanceError> {
        self.load_credit(symbol)
    }

    /// What the borrower would owe on `amount` tokens of a bill at `now`.
    pub fn repay_info(
        &self,
        bill_id: &str,
        now: Timestamp,
        amount: u128,
    ) -> Result<Option<RepayInfo>, FinanceError> {
        let bill = self.load_bill(bill_id)?;
        Ok(self.repay_method.calc_repay_info(&bill, now, amount)?)
    }

    /// Present value of `amount` tokens of a bill cashed at `now`.
    pub fn token_value(
        &self,
        bill_id: &str,
        now: Timestamp,
        amount: u128,
    ) -> Result<u128, FinanceError> {
        let bill = self.load_bill(bill_id)?;
        Ok(self.repay_method.get_token_value(amount, &bill, now)?)
    }

    // ── Loading ─────────────────────────────────────────────────────────

    pub(crate) fn load_bill(&self, id: &str) -> Result<Bill, FinanceError> {
        match self.store.get_bill(id) {
            Ok(bill) => Ok(bill),
            Err(StoreError::NotFound(_)) => Err(FinanceError::BillNotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn load_credit(&self, symbol: &str) -> Result<CreditToken, FinanceError> {
        match self.store.get_credit(symbol) {
            Ok(credit) => Ok(credit),
            Err(StoreError::NotFound(_)) => Err(FinanceError::CreditNotFound(symbol.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// A live handshake of the given kind. A handshake of another kind is
    /// treated as absent.
    pub(crate) fn load_handshake(
        &self,
        id: &TxHash,
        kind: HandshakeKind,
    ) -> Result<PendingHandshake, FinanceError> {
        match self.store.get_handshake(id) {
            Ok(h) if h.kind == kind => Ok(h),
            Ok(_) | Err(StoreError::NotFound(_)) => Err(FinanceError::HandshakeNotFound(*id)),
            Err(e) => Err(e.into()),
        }
    }
}

// ── Guards ──────────────────────────────────────────────────────────────

/// The declared actor must be the transaction signer.
pub(crate) fn require_signer(ctx: &TxContext, declared: &Address) -> Result<(), FinanceError> {
    require_address(declared, &ctx.from)
}

pub(crate) fn require_address(expected: &Address, actual: &Address) -> Result<(), FinanceError> {
    if expected != actual {
        return Err(FinanceError::AddressMismatch {
            expected: expected.clone(),
            actual: actual.clone(),
        });
    }
    Ok(())
}

pub(crate) fn require_identity(actual: Identity, expected: Identity) -> Result<(), FinanceError> {
    if actual != expected {
        return Err(FinanceError::RoleMismatch { expected, actual });
    }
    Ok(())
}

pub(crate) fn require_status(bill: &Bill, expected: BillStatus) -> Result<(), FinanceError> {
    if bill.status != expected {
        return Err(FinanceError::InvalidState {
            expected,
            actual: bill.status,
        });
    }
    Ok(())
}

/// Value may only move against a bill strictly before its due date.
pub(crate) fn require_not_matured(bill: &Bill, now: Timestamp) -> Result<(), FinanceError> {
    if bill.is_matured(now) {
        return Err(FinanceError::Expired(bill.id.clone()));
    }
    Ok(())
}

pub(crate) fn require_positive(amount: u128, what: &str) -> Result<(), FinanceError> {
    if amount == 0 {
        return Err(FinanceError::InvalidParameter(format!("{what} must be positive")));
    }
    Ok(())
}
