//! Default reports against bills still owed after maturity.

use tracing::warn;

use bill_interest::RepaymentMethod;
use bill_ledger::AssetLedger;
use bill_store::{BrokenRecord, FinanceStore};
use bill_types::BillStatus;

use crate::action::ReportBroken;
use crate::context::TxContext;
use crate::dispatch::ActionKind;
use crate::engine::{require_signer, require_status, FinanceEngine};
use crate::receipt::Receipt;
use crate::FinanceError;

impl<S: FinanceStore, L: AssetLedger, M: RepaymentMethod> FinanceEngine<S, L, M> {
    /// Record that a matured bill is still owed. Re-reporting replaces the
    /// previous record.
    pub(crate) fn report_broken(
        &self,
        ctx: &TxContext,
        req: ReportBroken,
    ) -> Result<Receipt, FinanceError> {
        require_signer(ctx, &req.report_addr)?;
        let bill = self.load_bill(&req.bill_id)?;
        require_status(&bill, BillStatus::Released)?;

        let now = ctx.block_time;
        if now < bill.due_date() {
            return Err(FinanceError::NotYetDue(bill.id));
        }

        let outstanding = self
            .store()
            .cash_requests_for_bill(&bill.id)?
            .iter()
            .try_fold(0u128, |acc, r| acc.checked_add(r.amount))
            .ok_or(FinanceError::Overflow)?;
        let overdue_value = match self.repay_method().calc_repay_info(&bill, now, outstanding)? {
            Some(info) => info.overdue_amount(),
            None => 0,
        };

        let record = BrokenRecord {
            bill_id: bill.id.clone(),
            tx_hash: ctx.tx_hash,
            reporter: req.report_addr,
            borrower: bill.borrower.clone(),
            bill_name: bill.name.clone(),
            overdue_days: bill.repay_date.days_to(now),
            overdue_value,
            timestamp: now,
        };
        self.store().put_broken_record(&record)?;

        warn!(
            bill_id = %bill.id,
            borrower = %bill.borrower,
            overdue_days = record.overdue_days,
            overdue_value,
            "bill reported broken"
        );
        let mut receipt = Receipt::new(ActionKind::ReportBroken, ctx.tx_hash).with_bill(&bill);
        receipt.push_log(ActionKind::ReportBroken, &record)?;
        Ok(receipt)
    }
}
