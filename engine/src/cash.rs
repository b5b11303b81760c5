//! Cash requests: holders queue bill tokens for redemption.

use tracing::info;

use bill_interest::RepaymentMethod;
use bill_ledger::AssetLedger;
use bill_store::{CashRequest, FinanceStore};
use bill_types::{AssetClass, BillStatus};

use crate::action::CashBill;
use crate::context::TxContext;
use crate::dispatch::ActionKind;
use crate::engine::{require_positive, require_signer, require_status, FinanceEngine};
use crate::journal::LedgerJournal;
use crate::receipt::{CashLog, Receipt};
use crate::FinanceError;

impl<S: FinanceStore, L: AssetLedger, M: RepaymentMethod> FinanceEngine<S, L, M> {
    /// File an irrevocable request to redeem bill tokens at the next repayment.
    ///
    /// The tokens are frozen on the holder's account and the present value at
    /// filing time is kept on the request.
    pub(crate) fn cash_bill(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        req: CashBill,
    ) -> Result<Receipt, FinanceError> {
        require_signer(ctx, &req.cash_addr)?;
        require_positive(req.amount, "cash amount")?;
        let bill = self.load_bill(&req.bill_id)?;
        require_status(&bill, BillStatus::Released)?;

        self.ledger()
            .require_available(AssetClass::Token, &bill.token_symbol, &req.cash_addr, req.amount)?;
        let value = self.repay_method().get_token_value(req.amount, &bill, ctx.block_time)?;
        journal.freeze(AssetClass::Token, &bill.token_symbol, &req.cash_addr, req.amount)?;

        let record = CashRequest {
            bill_id: bill.id.clone(),
            tx_hash: ctx.tx_hash,
            cash_addr: req.cash_addr,
            amount: req.amount,
            value,
            timestamp: ctx.block_time,
        };
        self.store().add_cash_request(&record)?;

        info!(
            bill_id = %bill.id,
            holder = %record.cash_addr,
            amount = record.amount,
            value,
            "cash request filed"
        );
        let mut receipt = Receipt::new(ActionKind::CashBill, ctx.tx_hash).with_bill(&bill);
        receipt.push_log(ActionKind::CashBill, &CashLog { record })?;
        Ok(receipt)
    }
}
