//! Settlement of outstanding cash requests by the borrower.

use tracing::{info, warn};

use bill_interest::RepaymentMethod;
use bill_ledger::AssetLedger;
use bill_store::{FinanceStore, RepayRecord};
use bill_types::{AssetClass, BillStatus, Timestamp};

use crate::action::RepayBill;
use crate::context::TxContext;
use crate::dispatch::ActionKind;
use crate::engine::{require_address, require_signer, require_status, FinanceEngine};
use crate::journal::LedgerJournal;
use crate::receipt::{Receipt, RepayLog, TransferTag};
use crate::FinanceError;

impl<S: FinanceStore, L: AssetLedger, M: RepaymentMethod> FinanceEngine<S, L, M> {
    /// Pay every pending cash request against the bill and burn the
    /// redeemed tokens.
    ///
    /// Once every token is redeemed the bill is blocked, its dependent credit
    /// thaws and any broken-promise record is cleared. Repaying a settled
    /// bill is a no-op.
    pub(crate) fn repay_bill(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        req: RepayBill,
    ) -> Result<Receipt, FinanceError> {
        require_signer(ctx, &req.repay_addr)?;
        let mut bill = self.load_bill(&req.bill_id)?;
        require_address(&bill.borrower, &req.repay_addr)?;

        if bill.is_settled() {
            warn!(bill_id = %bill.id, "bill already repaid");
            return Ok(Receipt::new(ActionKind::RepayBill, ctx.tx_hash).with_bill(&bill));
        }
        require_status(&bill, BillStatus::Released)?;

        let requests = self.store().cash_requests_for_bill(&bill.id)?;
        let requested = requests
            .iter()
            .try_fold(0u128, |acc, r| acc.checked_add(r.amount))
            .ok_or(FinanceError::Overflow)?;
        let in_flight = bill
            .total_redeem_token
            .checked_add(requested)
            .ok_or(FinanceError::Overflow)?;
        if bill.loan_amount < in_flight {
            return Err(FinanceError::TotalCashMismatch {
                loan: bill.loan_amount,
                redeemed: bill.total_redeem_token,
                requested,
            });
        }

        let now = ctx.block_time;
        let due = bill.due_date();
        let sink = self.config().sink_address.clone();
        let mut transfers = Vec::new();
        let mut settled = Vec::new();
        let mut repaid: u128 = 0;

        for request in &requests {
            // A request filed after maturity is charged as if cashed at
            // maturity plus the time it has waited since.
            let cash_time = if request.timestamp > due {
                due.plus(request.timestamp.elapsed_since(now))
            } else {
                now
            };
            let owed = self
                .repay_method()
                .calc_repay_info(&bill, cash_time, request.amount)?;
            let info = match owed {
                Some(info) if info.actual_amount > 0 => info,
                _ => {
                    warn!(
                        bill_id = %bill.id,
                        cash = %request.tx_hash,
                        "nothing owed on cash request, skipping"
                    );
                    continue;
                }
            };

            journal.transfer(
                AssetClass::Coins,
                &bill.coins_symbol,
                &bill.borrower,
                &request.cash_addr,
                info.actual_amount,
            )?;
            journal.transfer_frozen(
                AssetClass::Token,
                &bill.token_symbol,
                &request.cash_addr,
                &sink,
                request.amount,
            )?;
            transfers.push(TransferTag {
                from: bill.borrower.clone(),
                to: request.cash_addr.clone(),
                symbol: bill.coins_symbol.clone(),
                amount: info.actual_amount,
                remark: request.tx_hash.to_hex(),
            });
            transfers.push(TransferTag {
                from: request.cash_addr.clone(),
                to: sink.clone(),
                symbol: bill.token_symbol.clone(),
                amount: request.amount,
                remark: request.tx_hash.to_hex(),
            });

            repaid = repaid.checked_add(info.actual_amount).ok_or(FinanceError::Overflow)?;
            bill.total_cash_amount = bill
                .total_cash_amount
                .checked_add(info.actual_amount)
                .ok_or(FinanceError::Overflow)?;
            bill.total_repay_amount = bill
                .total_repay_amount
                .checked_add(info.actual_amount)
                .ok_or(FinanceError::Overflow)?;
            bill.total_redeem_token = bill
                .total_redeem_token
                .checked_add(request.amount)
                .ok_or(FinanceError::Overflow)?;
            bill.total_cashed_token = bill
                .total_cashed_token
                .checked_add(request.amount)
                .ok_or(FinanceError::Overflow)?;
            settled.push(request.tx_hash);

            if bill.is_fully_redeemed() {
                bill.current_repayed_count = bill.repay_count;
                bill.status = BillStatus::Blocked;
            }
        }

        let cleared = bill.is_settled();
        if cleared {
            bill.repay_date = Timestamp::NEVER;
            let pledged: Vec<_> = bill.pledged_tokens().cloned().collect();
            for token in &pledged {
                journal.unfreeze(AssetClass::Token, &token.symbol, &bill.borrower, token.amount)?;
            }
        }

        for hash in &settled {
            self.store().remove_cash_request(&bill.id, hash)?;
        }
        self.store().put_bill(&bill)?;
        let record = RepayRecord {
            bill_id: bill.id.clone(),
            tx_hash: ctx.tx_hash,
            repay_addr: req.repay_addr,
            timestamp: now,
            value: repaid,
            cash_hashes: settled,
            arrears_cleared: cleared,
        };
        self.store().append_repay_record(&record)?;
        if cleared {
            self.store().delete_broken_record(&bill.id)?;
        }

        info!(
            bill_id = %bill.id,
            settled = record.cash_hashes.len(),
            repaid,
            cleared,
            "repayment processed"
        );
        let mut receipt = Receipt::new(ActionKind::RepayBill, ctx.tx_hash).with_bill(&bill);
        receipt.push_log(
            ActionKind::RepayBill,
            &RepayLog {
                record,
                transfers: transfers.clone(),
            },
        )?;
        receipt.transfers = transfers;
        Ok(receipt)
    }
}
