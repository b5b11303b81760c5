//! Bill state machine: create, release, un-release.

use tracing::{info, warn};

use bill_interest::{calc_origin_price, RepaymentMethod};
use bill_ledger::AssetLedger;
use bill_store::FinanceStore;
use bill_types::params::BILL_REPAY_COUNT;
use bill_types::{AssetClass, Bill, BillStatus, DpdtToken, Identity, Timestamp};

use crate::action::{CreateBill, ReleaseBill, UnReleaseBill};
use crate::context::TxContext;
use crate::dispatch::ActionKind;
use crate::engine::{
    require_address, require_identity, require_positive, require_signer, require_status,
    FinanceEngine,
};
use crate::journal::LedgerJournal;
use crate::receipt::{BillLog, Receipt};
use crate::FinanceError;

impl<S: FinanceStore, L: AssetLedger, M: RepaymentMethod> FinanceEngine<S, L, M> {
    pub(crate) fn create_bill(
        &self,
        ctx: &TxContext,
        req: CreateBill,
    ) -> Result<Receipt, FinanceError> {
        require_signer(ctx, &req.addr)?;
        require_identity(req.creator_identity, Identity::Core)?;
        require_address(&req.borrower, &req.addr)?;
        if req.id.is_empty() || req.token_symbol.is_empty() || req.coins_symbol.is_empty() {
            return Err(FinanceError::InvalidParameter("bill id and symbols must be set".into()));
        }
        require_positive(req.loan_amount, "loan amount")?;
        require_positive(req.circulation_time as u128, "circulation time")?;
        for rate in [req.rate, req.overdue_rate] {
            if rate < 0 {
                return Err(FinanceError::NegativeRate(rate));
            }
        }

        if self.store().bill_exists(&req.id)? {
            let existing = self.load_bill(&req.id)?;
            if existing.status != BillStatus::Deleted {
                return Err(FinanceError::BillExists(req.id));
            }
        }

        let now = ctx.block_time;
        let mut dpdt_tokens = Vec::new();
        if req.need_dpdt_token {
            // Credit must outlive the bill if it is released right away.
            let maturity = now.plus(req.circulation_time);
            let mut total: u128 = 0;
            for pledge in &req.dpdt_tokens {
                let credit = match self.load_credit(&pledge.symbol) {
                    Ok(c) => c,
                    Err(FinanceError::CreditNotFound(_)) => {
                        warn!(
                            symbol = %pledge.symbol,
                            bill_id = %req.id,
                            "skipping unknown dependent credit"
                        );
                        continue;
                    }
                    Err(e) => return Err(e),
                };
                if credit.grantee_addr != req.borrower || credit.expires_at() <= maturity {
                    warn!(
                        symbol = %pledge.symbol,
                        bill_id = %req.id,
                        expires = %credit.expires_at(),
                        "skipping invalid dependent credit"
                    );
                    continue;
                }
                total = total.checked_add(pledge.amount).ok_or(FinanceError::Overflow)?;
                dpdt_tokens.push(DpdtToken::new(pledge.symbol.clone(), pledge.amount));
            }
            if total < req.loan_amount {
                return Err(FinanceError::InsufficientDependentCredit {
                    total,
                    loan: req.loan_amount,
                });
            }
        }

        let overdue_grace_period = match req.overdue_grace_period {
            0 => self.config().default_overdue_grace_period,
            n => n,
        };
        let overdue_limit = match req.overdue_limit {
            0 => self.config().default_overdue_limit,
            n => n,
        };
        let circulation_days = req.circulation_time / bill_types::ONE_DAY_SECS;
        let bill = Bill {
            origin_price: calc_origin_price(req.rate, circulation_days)?,
            id: req.id,
            token_symbol: req.token_symbol,
            coins_symbol: req.coins_symbol,
            borrower: req.borrower,
            loan_amount: req.loan_amount,
            rate: req.rate,
            overdue_rate: req.overdue_rate,
            circulation_time: req.circulation_time,
            overdue_grace_period,
            overdue_limit,
            split: req.split,
            repay_count: BILL_REPAY_COUNT,
            name: req.name,
            remark: req.remark,
            status: BillStatus::Created,
            create_time: now,
            issue_date: Timestamp::EPOCH,
            repay_date: Timestamp::EPOCH,
            current_repayed_count: 0,
            need_dpdt_token: req.need_dpdt_token,
            dpdt_tokens,
            total_cash_amount: 0,
            total_repay_amount: 0,
            total_redeem_token: 0,
            total_cashed_token: 0,
        };
        self.store().put_bill(&bill)?;

        info!(
            bill_id = %bill.id,
            loan = bill.loan_amount,
            origin_price = bill.origin_price,
            "bill created"
        );
        let mut receipt = Receipt::new(ActionKind::CreateBill, ctx.tx_hash).with_bill(&bill);
        receipt.push_log(ActionKind::CreateBill, &BillLog { bill })?;
        Ok(receipt)
    }

    /// Issue the bill to the market, pledging its dependent credit.
    pub(crate) fn release_bill(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        req: ReleaseBill,
    ) -> Result<Receipt, FinanceError> {
        require_signer(ctx, &req.release_addr)?;
        require_identity(req.release_identity, Identity::Core)?;
        let mut bill = self.load_bill(&req.id)?;
        require_address(&bill.borrower, &req.release_addr)?;
        require_status(&bill, BillStatus::Created)?;

        self.ledger().require_available(
            AssetClass::Token,
            &bill.token_symbol,
            &bill.borrower,
            bill.loan_amount,
        )?;

        for token in bill.pledged_tokens() {
            self.ledger()
                .require_available(AssetClass::Token, &token.symbol, &bill.borrower, token.amount)?;
            journal.freeze(AssetClass::Token, &token.symbol, &bill.borrower, token.amount)?;
        }

        bill.issue_date = ctx.block_time;
        bill.repay_date = bill.due_date();
        bill.status = BillStatus::Released;
        self.store().put_bill(&bill)?;

        info!(bill_id = %bill.id, due = %bill.repay_date, "bill released");
        let mut receipt = Receipt::new(ActionKind::ReleaseBill, ctx.tx_hash).with_bill(&bill);
        receipt.push_log(ActionKind::ReleaseBill, &BillLog { bill })?;
        Ok(receipt)
    }

    /// Withdraw a released bill whose tokens have not left the borrower.
    pub(crate) fn unrelease_bill(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        req: UnReleaseBill,
    ) -> Result<Receipt, FinanceError> {
        require_signer(ctx, &req.unrelease_addr)?;
        require_identity(req.unrelease_identity, Identity::Core)?;
        let mut bill = self.load_bill(&req.id)?;
        require_address(&bill.borrower, &req.unrelease_addr)?;
        require_status(&bill, BillStatus::Released)?;

        let held = self
            .ledger()
            .get_balance(AssetClass::Token, &bill.token_symbol, &bill.borrower)?;
        if held.available < bill.loan_amount {
            return Err(FinanceError::AlreadyPublished(bill.id));
        }

        for token in bill.pledged_tokens() {
            self.ledger()
                .require_frozen(AssetClass::Token, &token.symbol, &bill.borrower, token.amount)?;
            journal.unfreeze(AssetClass::Token, &token.symbol, &bill.borrower, token.amount)?;
        }

        bill.status = BillStatus::Created;
        bill.issue_date = Timestamp::EPOCH;
        bill.repay_date = Timestamp::EPOCH;
        self.store().put_bill(&bill)?;

        info!(bill_id = %bill.id, "bill withdrawn from circulation");
        let mut receipt = Receipt::new(ActionKind::UnReleaseBill, ctx.tx_hash).with_bill(&bill);
        receipt.push_log(ActionKind::UnReleaseBill, &BillLog { bill })?;
        Ok(receipt)
    }
}
