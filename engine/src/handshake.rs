//! Two-phase exchanges of bill tokens.
//!
//! Deliver, split and financing share one protocol: the proposer's tokens
//! are frozen under a pending handshake keyed by the proposing transaction,
//! then the counterparty either accepts (tokens move) or refuses (tokens
//! thaw). The proposer may withdraw at any point before that.

use tracing::info;

use bill_interest::{calc_token_value_for_financing, RepaymentMethod};
use bill_ledger::AssetLedger;
use bill_store::{FinanceStore, HandshakeKind, PendingHandshake};
use bill_types::{Address, AssetClass, Bill, BillStatus, Identity, TxHash};

use crate::action::{
    ApplyForFinancing, ConfirmDeliverBill, ConfirmFinancing, ConfirmSplitBill, DeliverBill,
    SplitBill, UnApplyForFinancing, UnDeliverBill, UnSplitBill,
};
use crate::context::TxContext;
use crate::dispatch::ActionKind;
use crate::engine::{
    require_address, require_identity, require_not_matured, require_positive, require_signer,
    require_status, FinanceEngine,
};
use crate::journal::LedgerJournal;
use crate::receipt::{ConfirmLog, HandshakeLog, Receipt, TransferTag};
use crate::FinanceError;

/// Identities required of the proposer and the counterparty.
fn roles(kind: HandshakeKind) -> (Identity, Identity) {
    match kind {
        HandshakeKind::Deliver => (Identity::Core, Identity::Supplier),
        HandshakeKind::Split => (Identity::Supplier, Identity::Supplier),
        HandshakeKind::Financing => (Identity::Supplier, Identity::Funder),
    }
}

/// Propose, cancel and confirm action kinds.
fn actions(kind: HandshakeKind) -> (ActionKind, ActionKind, ActionKind) {
    match kind {
        HandshakeKind::Deliver => (
            ActionKind::DeliverBill,
            ActionKind::UnDeliverBill,
            ActionKind::ConfirmDeliverBill,
        ),
        HandshakeKind::Split => (
            ActionKind::SplitBill,
            ActionKind::UnSplitBill,
            ActionKind::ConfirmSplitBill,
        ),
        HandshakeKind::Financing => (
            ActionKind::ApplyForFinancing,
            ActionKind::UnApplyForFinancing,
            ActionKind::ConfirmFinancing,
        ),
    }
}

enum Counterparty {
    /// Named by the proposer.
    Declared { addr: Address, identity: Identity },
    /// The creditor behind a dependent credit the bill declares.
    Creditor { symbol: String },
}

struct Proposal {
    kind: HandshakeKind,
    proposer: Address,
    proposer_identity: Identity,
    counterparty: Counterparty,
    bill_id: String,
    amount: u128,
    remark: String,
}

impl<S: FinanceStore, L: AssetLedger, M: RepaymentMethod> FinanceEngine<S, L, M> {
    // ── Deliver ─────────────────────────────────────────────────────────

    pub(crate) fn deliver_bill(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        req: DeliverBill,
    ) -> Result<Receipt, FinanceError> {
        let proposal = Proposal {
            kind: HandshakeKind::Deliver,
            proposer: req.deliver_addr,
            proposer_identity: req.deliver_identity,
            counterparty: Counterparty::Declared {
                addr: req.to_addr,
                identity: req.to_identity,
            },
            bill_id: req.bill_id,
            amount: req.amount,
            remark: req.remark,
        };
        self.propose(ctx, journal, proposal)
    }

    pub(crate) fn undeliver_bill(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        req: UnDeliverBill,
    ) -> Result<Receipt, FinanceError> {
        self.cancel(
            ctx,
            journal,
            HandshakeKind::Deliver,
            &req.undeliver_addr,
            req.undeliver_identity,
            &req.deliver_id,
        )
    }

    pub(crate) fn confirm_deliver_bill(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        req: ConfirmDeliverBill,
    ) -> Result<Receipt, FinanceError> {
        self.resolve(
            ctx,
            journal,
            HandshakeKind::Deliver,
            &req.confirm_addr,
            req.confirm_identity,
            &req.deliver_id,
            req.ack,
        )
    }

    // ── Split ───────────────────────────────────────────────────────────

    pub(crate) fn split_bill(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        req: SplitBill,
    ) -> Result<Receipt, FinanceError> {
        let proposal = Proposal {
            kind: HandshakeKind::Split,
            proposer: req.split_addr,
            proposer_identity: req.split_identity,
            counterparty: Counterparty::Declared {
                addr: req.to_addr,
                identity: req.to_identity,
            },
            bill_id: req.bill_id,
            amount: req.amount,
            remark: req.remark,
        };
        self.propose(ctx, journal, proposal)
    }

    pub(crate) fn unsplit_bill(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        req: UnSplitBill,
    ) -> Result<Receipt, FinanceError> {
        self.cancel(
            ctx,
            journal,
            HandshakeKind::Split,
            &req.unsplit_addr,
            req.unsplit_identity,
            &req.split_id,
        )
    }

    pub(crate) fn confirm_split_bill(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        req: ConfirmSplitBill,
    ) -> Result<Receipt, FinanceError> {
        self.resolve(
            ctx,
            journal,
            HandshakeKind::Split,
            &req.confirm_addr,
            req.confirm_identity,
            &req.split_id,
            req.ack,
        )
    }

    // ── Financing ───────────────────────────────────────────────────────

    pub(crate) fn apply_for_financing(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        req: ApplyForFinancing,
    ) -> Result<Receipt, FinanceError> {
        let proposal = Proposal {
            kind: HandshakeKind::Financing,
            proposer: req.apply_addr,
            proposer_identity: req.apply_identity,
            counterparty: Counterparty::Creditor { symbol: req.dpdt_symbol },
            bill_id: req.bill_id,
            amount: req.amount,
            remark: req.remark,
        };
        self.propose(ctx, journal, proposal)
    }

    pub(crate) fn unapply_for_financing(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        req: UnApplyForFinancing,
    ) -> Result<Receipt, FinanceError> {
        self.cancel(
            ctx,
            journal,
            HandshakeKind::Financing,
            &req.unapply_addr,
            req.unapply_identity,
            &req.apply_id,
        )
    }

    pub(crate) fn confirm_financing(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        req: ConfirmFinancing,
    ) -> Result<Receipt, FinanceError> {
        self.resolve(
            ctx,
            journal,
            HandshakeKind::Financing,
            &req.confirm_addr,
            req.confirm_identity,
            &req.apply_id,
            req.ack,
        )
    }

    // ── Protocol ────────────────────────────────────────────────────────

    fn propose(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        proposal: Proposal,
    ) -> Result<Receipt, FinanceError> {
        let (proposer_role, counterparty_role) = roles(proposal.kind);
        require_signer(ctx, &proposal.proposer)?;
        require_identity(proposal.proposer_identity, proposer_role)?;
        if let Counterparty::Declared { identity, .. } = &proposal.counterparty {
            require_identity(*identity, counterparty_role)?;
        }
        require_positive(proposal.amount, "handshake amount")?;

        let mut bill = self.load_bill(&proposal.bill_id)?;
        require_status(&bill, BillStatus::Released)?;
        require_not_matured(&bill, ctx.block_time)?;

        let (counterparty, credit_symbol) = match proposal.counterparty {
            Counterparty::Declared { addr, .. } => {
                match proposal.kind {
                    HandshakeKind::Deliver => require_address(&bill.borrower, &proposal.proposer)?,
                    HandshakeKind::Split if !bill.split => {
                        return Err(FinanceError::NotSplittable(bill.id));
                    }
                    _ => {}
                }
                (addr, None)
            }
            Counterparty::Creditor { symbol } => {
                let creditor = self.reserve_credit(&mut bill, &symbol, proposal.amount)?;
                (creditor, Some(symbol))
            }
        };

        self.ledger().require_available(
            AssetClass::Token,
            &bill.token_symbol,
            &proposal.proposer,
            proposal.amount,
        )?;
        journal.freeze(
            AssetClass::Token,
            &bill.token_symbol,
            &proposal.proposer,
            proposal.amount,
        )?;

        let handshake = PendingHandshake {
            id: ctx.tx_hash,
            kind: proposal.kind,
            bill_id: bill.id.clone(),
            proposer: proposal.proposer,
            counterparty,
            amount: proposal.amount,
            timestamp: ctx.block_time,
            credit_symbol,
            remark: proposal.remark,
        };
        self.store().put_handshake(&handshake)?;
        if handshake.credit_symbol.is_some() {
            self.store().put_bill(&bill)?;
        }

        info!(
            kind = %handshake.kind,
            id = %handshake.id,
            bill_id = %bill.id,
            amount = handshake.amount,
            "handshake proposed"
        );
        let (action, _, _) = actions(proposal.kind);
        let mut receipt = Receipt::new(action, ctx.tx_hash).with_bill(&bill);
        receipt.push_log(action, &HandshakeLog { handshake })?;
        Ok(receipt)
    }

    /// Reserve `amount` of a declared dependent credit and return the
    /// creditor who will be asked to fund it.
    fn reserve_credit(
        &self,
        bill: &mut Bill,
        symbol: &str,
        amount: u128,
    ) -> Result<Address, FinanceError> {
        let unused = bill
            .dpdt_token(symbol)
            .ok_or_else(|| FinanceError::CreditMismatch(symbol.to_string()))?
            .unused();
        let credit = self.load_credit(symbol)?;
        if amount > unused {
            return Err(FinanceError::UnusedCreditNotEnough {
                symbol: symbol.to_string(),
                unused,
                requested: amount,
            });
        }
        if let Some(token) = bill.dpdt_token_mut(symbol) {
            token.used = token.used.checked_add(amount).ok_or(FinanceError::Overflow)?;
        }
        Ok(credit.credit_addr)
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        kind: HandshakeKind,
        confirm_addr: &Address,
        confirm_identity: Identity,
        id: &TxHash,
        ack: bool,
    ) -> Result<Receipt, FinanceError> {
        require_signer(ctx, confirm_addr)?;
        require_identity(confirm_identity, roles(kind).1)?;
        let handshake = self.load_handshake(id, kind)?;
        require_address(&handshake.counterparty, confirm_addr)?;

        let credit = match &handshake.credit_symbol {
            Some(symbol) => {
                let credit = self.load_credit(symbol)?;
                if credit.is_expired(ctx.block_time) {
                    return Err(FinanceError::CreditExpired(symbol.clone()));
                }
                Some(credit)
            }
            None => None,
        };

        let mut bill = self.load_bill(&handshake.bill_id)?;
        require_not_matured(&bill, ctx.block_time)?;
        require_status(&bill, BillStatus::Released)?;

        let mut transfers = Vec::new();
        if ack {
            let remark = handshake.id.to_hex();
            if let Some(credit) = &credit {
                let days = ctx.block_time.days_to(bill.due_date());
                let value = calc_token_value_for_financing(handshake.amount, credit.rate, days);
                if value == 0 {
                    return Err(FinanceError::WrongTokenValue);
                }
                self.ledger().require_available(
                    AssetClass::Coins,
                    &bill.coins_symbol,
                    &handshake.counterparty,
                    value,
                )?;
                journal.transfer(
                    AssetClass::Coins,
                    &bill.coins_symbol,
                    &handshake.counterparty,
                    &handshake.proposer,
                    value,
                )?;
                transfers.push(TransferTag {
                    from: handshake.counterparty.clone(),
                    to: handshake.proposer.clone(),
                    symbol: bill.coins_symbol.clone(),
                    amount: value,
                    remark: remark.clone(),
                });
            }
            journal.transfer_frozen(
                AssetClass::Token,
                &bill.token_symbol,
                &handshake.proposer,
                &handshake.counterparty,
                handshake.amount,
            )?;
            transfers.push(TransferTag {
                from: handshake.proposer.clone(),
                to: handshake.counterparty.clone(),
                symbol: bill.token_symbol.clone(),
                amount: handshake.amount,
                remark,
            });
        } else {
            self.unwind(journal, &mut bill, &handshake)?;
        }

        self.store().delete_handshake(&handshake.id)?;
        if !ack && handshake.credit_symbol.is_some() {
            self.store().put_bill(&bill)?;
        }

        info!(kind = %kind, id = %handshake.id, bill_id = %bill.id, ack, "handshake resolved");
        let (_, _, action) = actions(kind);
        let mut receipt = Receipt::new(action, ctx.tx_hash).with_bill(&bill);
        receipt.push_log(
            action,
            &ConfirmLog {
                handshake_id: handshake.id,
                ack,
                transfers: transfers.clone(),
            },
        )?;
        receipt.transfers = transfers;
        Ok(receipt)
    }

    fn cancel(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        kind: HandshakeKind,
        cancel_addr: &Address,
        cancel_identity: Identity,
        id: &TxHash,
    ) -> Result<Receipt, FinanceError> {
        require_signer(ctx, cancel_addr)?;
        require_identity(cancel_identity, roles(kind).0)?;
        let handshake = self.load_handshake(id, kind)?;
        require_address(&handshake.proposer, cancel_addr)?;

        let mut bill = self.load_bill(&handshake.bill_id)?;
        self.unwind(journal, &mut bill, &handshake)?;

        self.store().delete_handshake(&handshake.id)?;
        if handshake.credit_symbol.is_some() {
            self.store().put_bill(&bill)?;
        }

        info!(kind = %kind, id = %handshake.id, bill_id = %bill.id, "handshake withdrawn");
        let (_, action, _) = actions(kind);
        let mut receipt = Receipt::new(action, ctx.tx_hash).with_bill(&bill);
        receipt.push_log(action, &HandshakeLog { handshake })?;
        Ok(receipt)
    }

    /// Thaw the proposer's tokens and hand back any reserved credit.
    fn unwind(
        &self,
        journal: &mut LedgerJournal<'_, L>,
        bill: &mut Bill,
        handshake: &PendingHandshake,
    ) -> Result<(), FinanceError> {
        journal.unfreeze(
            AssetClass::Token,
            &bill.token_symbol,
            &handshake.proposer,
            handshake.amount,
        )?;
        if let Some(token) = handshake
            .credit_symbol
            .as_deref()
            .and_then(|symbol| bill.dpdt_token_mut(symbol))
        {
            token.used = token.used.saturating_sub(handshake.amount);
        }
        Ok(())
    }
}
