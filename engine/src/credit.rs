//! Credit registry: a funder extends a credit token to a core enterprise.

use tracing::info;

use bill_ledger::AssetLedger;
use bill_interest::RepaymentMethod;
use bill_store::FinanceStore;
use bill_types::{AssetClass, CreditToken, Identity};

use crate::action::AddCreditToken;
use crate::context::TxContext;
use crate::dispatch::ActionKind;
use crate::engine::{require_identity, require_signer, FinanceEngine};
use crate::journal::LedgerJournal;
use crate::receipt::{CreditLog, Receipt, TransferTag};
use crate::FinanceError;

impl<S: FinanceStore, L: AssetLedger, M: RepaymentMethod> FinanceEngine<S, L, M> {
    /// Transfer the credit token to the grantee and (re)record the registry entry.
    ///
    /// Re-adding a symbol replaces the previous entry.
    pub(crate) fn add_credit_token(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        req: AddCreditToken,
    ) -> Result<Receipt, FinanceError> {
        require_signer(ctx, &req.credit_addr)?;
        require_identity(req.credit_identity, Identity::Funder)?;
        require_identity(req.grantee_identity, Identity::Core)?;
        if req.rate < 0 {
            return Err(FinanceError::NegativeRate(req.rate));
        }

        self.ledger()
            .require_available(AssetClass::Token, &req.symbol, &req.credit_addr, req.amount)?;
        journal.transfer(
            AssetClass::Token,
            &req.symbol,
            &req.credit_addr,
            &req.grantee_addr,
            req.amount,
        )?;

        let credit = CreditToken {
            symbol: req.symbol.clone(),
            credit_addr: req.credit_addr.clone(),
            grantee_addr: req.grantee_addr.clone(),
            amount: req.amount,
            rate: req.rate,
            add_time: ctx.block_time,
            duration: req.duration,
            remark: req.remark.clone(),
        };
        self.store().put_credit(&credit)?;

        info!(
            symbol = %credit.symbol,
            grantee = %credit.grantee_addr,
            amount = credit.amount,
            "credit added"
        );

        let tag = TransferTag {
            from: req.credit_addr,
            to: req.grantee_addr,
            symbol: req.symbol,
            amount: req.amount,
            remark: req.remark,
        };
        let mut receipt = Receipt::new(ActionKind::AddCreditToken, ctx.tx_hash);
        receipt.push_log(
            ActionKind::AddCreditToken,
            &CreditLog {
                symbol: credit.symbol.clone(),
                credit_addr: credit.credit_addr.clone(),
                grantee_addr: credit.grantee_addr.clone(),
                amount: credit.amount,
                expire: credit.expires_at(),
                transfers: vec![tag.clone()],
            },
        )?;
        receipt.transfers.push(tag);
        Ok(receipt)
    }
}
