//! Deposits, withdrawals and plain transfers.

use tracing::info;

use bill_interest::RepaymentMethod;
use bill_ledger::AssetLedger;
use bill_store::FinanceStore;

use crate::action::{DepositAsset, TransferCoins, WithdrawlAsset};
use crate::context::TxContext;
use crate::dispatch::ActionKind;
use crate::engine::{require_positive, require_signer, FinanceEngine};
use crate::journal::LedgerJournal;
use crate::receipt::{AssetLog, Receipt, TransferLog, TransferTag};
use crate::FinanceError;

impl<S: FinanceStore, L: AssetLedger, M: RepaymentMethod> FinanceEngine<S, L, M> {
    /// Announce a deposit the holder has already made into the engine's
    /// sub-account. Only checks and logs.
    pub(crate) fn deposit_asset(
        &self,
        ctx: &TxContext,
        req: DepositAsset,
    ) -> Result<Receipt, FinanceError> {
        require_signer(ctx, &req.deposit_addr)?;
        let class = self.config().asset_class_for(&req.symbol);
        self.ledger()
            .require_available(class, &req.symbol, &req.deposit_addr, req.amount)?;

        info!(addr = %req.deposit_addr, symbol = %req.symbol, amount = req.amount, "deposit");
        let mut receipt = Receipt::new(ActionKind::DepositAsset, ctx.tx_hash);
        receipt.push_log(
            ActionKind::DepositAsset,
            &AssetLog {
                addr: req.deposit_addr,
                class,
                symbol: req.symbol,
                amount: req.amount,
                remark: req.remark,
            },
        )?;
        Ok(receipt)
    }

    /// Announce a withdrawal. Only logs; the host ledger moves the funds.
    pub(crate) fn withdrawl_asset(
        &self,
        ctx: &TxContext,
        req: WithdrawlAsset,
    ) -> Result<Receipt, FinanceError> {
        require_signer(ctx, &req.withdraw_addr)?;
        let class = self.config().asset_class_for(&req.symbol);

        info!(addr = %req.withdraw_addr, symbol = %req.symbol, amount = req.amount, "withdrawal");
        let mut receipt = Receipt::new(ActionKind::WithdrawlAsset, ctx.tx_hash);
        receipt.push_log(
            ActionKind::WithdrawlAsset,
            &AssetLog {
                addr: req.withdraw_addr,
                class,
                symbol: req.symbol,
                amount: req.amount,
                remark: req.remark,
            },
        )?;
        Ok(receipt)
    }

    pub(crate) fn transfer_coins(
        &self,
        ctx: &TxContext,
        journal: &mut LedgerJournal<'_, L>,
        req: TransferCoins,
    ) -> Result<Receipt, FinanceError> {
        require_signer(ctx, &req.from_addr)?;
        require_positive(req.amount, "transfer amount")?;
        self.ledger()
            .require_available(req.exec, &req.symbol, &req.from_addr, req.amount)?;
        journal.transfer(req.exec, &req.symbol, &req.from_addr, &req.to_addr, req.amount)?;

        let tag = TransferTag {
            from: req.from_addr,
            to: req.to_addr,
            symbol: req.symbol,
            amount: req.amount,
            remark: req.remark,
        };
        let mut receipt = Receipt::new(ActionKind::TransferCoins, ctx.tx_hash);
        receipt.push_log(
            ActionKind::TransferCoins,
            &TransferLog {
                transfers: vec![tag.clone()],
            },
        )?;
        receipt.transfers.push(tag);
        Ok(receipt)
    }
}
