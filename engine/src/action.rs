//! Action requests accepted by the engine.
//!
//! Identities are declared by the caller and checked against what each
//! action requires; addresses are checked against the transaction signer.

use serde::{Deserialize, Serialize};

use bill_types::{Address, AssetClass, Identity, TxHash};

use crate::dispatch::ActionKind;

// ── Credit registry and plain assets ────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCreditToken {
    pub credit_addr: Address,
    pub credit_identity: Identity,
    pub grantee_addr: Address,
    pub grantee_identity: Identity,
    pub symbol: String,
    pub amount: u128,
    /// Financing discount rate, scaled by 1e8.
    pub rate: i64,
    /// Validity window in seconds.
    pub duration: u64,
    #[serde(default)]
    pub remark: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositAsset {
    pub deposit_addr: Address,
    pub symbol: String,
    pub amount: u128,
    #[serde(default)]
    pub remark: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawlAsset {
    pub withdraw_addr: Address,
    pub symbol: String,
    pub amount: u128,
    #[serde(default)]
    pub remark: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCoins {
    pub from_addr: Address,
    pub to_addr: Address,
    pub exec: AssetClass,
    pub symbol: String,
    pub amount: u128,
    #[serde(default)]
    pub remark: String,
}

// ── Bill lifecycle ──────────────────────────────────────────────────────

/// A dependent credit a new bill pledges.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditPledge {
    pub symbol: String,
    pub amount: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBill {
    pub addr: Address,
    pub creator_identity: Identity,
    pub id: String,
    pub token_symbol: String,
    pub coins_symbol: String,
    pub borrower: Address,
    pub loan_amount: u128,
    pub rate: i64,
    pub overdue_rate: i64,
    pub circulation_time: u64,
    /// Zero selects the configured default.
    #[serde(default)]
    pub overdue_grace_period: u64,
    /// Zero selects the configured default.
    #[serde(default)]
    pub overdue_limit: u64,
    #[serde(default)]
    pub split: bool,
    #[serde(default)]
    pub need_dpdt_token: bool,
    #[serde(default)]
    pub dpdt_tokens: Vec<CreditPledge>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub remark: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseBill {
    pub release_addr: Address,
    pub release_identity: Identity,
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnReleaseBill {
    pub unrelease_addr: Address,
    pub unrelease_identity: Identity,
    pub id: String,
}

// ── Handshakes ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverBill {
    pub deliver_addr: Address,
    pub deliver_identity: Identity,
    pub to_addr: Address,
    pub to_identity: Identity,
    pub bill_id: String,
    pub amount: u128,
    #[serde(default)]
    pub remark: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnDeliverBill {
    pub undeliver_addr: Address,
    pub undeliver_identity: Identity,
    pub deliver_id: TxHash,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmDeliverBill {
    pub confirm_addr: Address,
    pub confirm_identity: Identity,
    pub deliver_id: TxHash,
    pub ack: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitBill {
    pub split_addr: Address,
    pub split_identity: Identity,
    pub to_addr: Address,
    pub to_identity: Identity,
    pub bill_id: String,
    pub amount: u128,
    #[serde(default)]
    pub remark: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnSplitBill {
    pub unsplit_addr: Address,
    pub unsplit_identity: Identity,
    pub split_id: TxHash,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmSplitBill {
    pub confirm_addr: Address,
    pub confirm_identity: Identity,
    pub split_id: TxHash,
    pub ack: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyForFinancing {
    pub apply_addr: Address,
    pub apply_identity: Identity,
    pub bill_id: String,
    /// The pledged credit the funder is drawn from.
    pub dpdt_symbol: String,
    pub amount: u128,
    #[serde(default)]
    pub remark: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnApplyForFinancing {
    pub unapply_addr: Address,
    pub unapply_identity: Identity,
    pub apply_id: TxHash,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmFinancing {
    pub confirm_addr: Address,
    pub confirm_identity: Identity,
    pub apply_id: TxHash,
    pub ack: bool,
}

// ── Settlement ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashBill {
    pub cash_addr: Address,
    pub bill_id: String,
    pub amount: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepayBill {
    pub repay_addr: Address,
    pub bill_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportBroken {
    pub report_addr: Address,
    pub bill_id: String,
}

/// Every action the engine executes, tagged by its registered name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinanceAction {
    AddCreditToken(AddCreditToken),
    DepositAsset(DepositAsset),
    WithdrawlAsset(WithdrawlAsset),
    TransferCoins(TransferCoins),
    CreateBill(CreateBill),
    ReleaseBill(ReleaseBill),
    UnReleaseBill(UnReleaseBill),
    ApplyForFinancing(ApplyForFinancing),
    UnApplyForFinancing(UnApplyForFinancing),
    ConfirmFinancing(ConfirmFinancing),
    CashBill(CashBill),
    RepayBill(RepayBill),
    ReportBroken(ReportBroken),
    DeliverBill(DeliverBill),
    UnDeliverBill(UnDeliverBill),
    ConfirmDeliverBill(ConfirmDeliverBill),
    SplitBill(SplitBill),
    UnSplitBill(UnSplitBill),
    ConfirmSplitBill(ConfirmSplitBill),
}

impl FinanceAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::AddCreditToken(_) => ActionKind::AddCreditToken,
            Self::DepositAsset(_) => ActionKind::DepositAsset,
            Self::WithdrawlAsset(_) => ActionKind::WithdrawlAsset,
            Self::TransferCoins(_) => ActionKind::TransferCoins,
            Self::CreateBill(_) => ActionKind::CreateBill,
            Self::ReleaseBill(_) => ActionKind::ReleaseBill,
            Self::UnReleaseBill(_) => ActionKind::UnReleaseBill,
            Self::ApplyForFinancing(_) => ActionKind::ApplyForFinancing,
            Self::UnApplyForFinancing(_) => ActionKind::UnApplyForFinancing,
            Self::ConfirmFinancing(_) => ActionKind::ConfirmFinancing,
            Self::CashBill(_) => ActionKind::CashBill,
            Self::RepayBill(_) => ActionKind::RepayBill,
            Self::ReportBroken(_) => ActionKind::ReportBroken,
            Self::DeliverBill(_) => ActionKind::DeliverBill,
            Self::UnDeliverBill(_) => ActionKind::UnDeliverBill,
            Self::ConfirmDeliverBill(_) => ActionKind::ConfirmDeliverBill,
            Self::SplitBill(_) => ActionKind::SplitBill,
            Self::UnSplitBill(_) => ActionKind::UnSplitBill,
            Self::ConfirmSplitBill(_) => ActionKind::ConfirmSplitBill,
        }
    }

    /// The address the action claims to be signed by.
    pub fn actor(&self) -> &Address {
        match self {
            Self::AddCreditToken(a) => &a.credit_addr,
            Self::DepositAsset(a) => &a.deposit_addr,
            Self::WithdrawlAsset(a) => &a.withdraw_addr,
            Self::TransferCoins(a) => &a.from_addr,
            Self::CreateBill(a) => &a.addr,
            Self::ReleaseBill(a) => &a.release_addr,
            Self::UnReleaseBill(a) => &a.unrelease_addr,
            Self::ApplyForFinancing(a) => &a.apply_addr,
            Self::UnApplyForFinancing(a) => &a.unapply_addr,
            Self::ConfirmFinancing(a) => &a.confirm_addr,
            Self::CashBill(a) => &a.cash_addr,
            Self::RepayBill(a) => &a.repay_addr,
            Self::ReportBroken(a) => &a.report_addr,
            Self::DeliverBill(a) => &a.deliver_addr,
            Self::UnDeliverBill(a) => &a.undeliver_addr,
            Self::ConfirmDeliverBill(a) => &a.confirm_addr,
            Self::SplitBill(a) => &a.split_addr,
            Self::UnSplitBill(a) => &a.unsplit_addr,
            Self::ConfirmSplitBill(a) => &a.confirm_addr,
        }
    }

    /// Canonical byte encoding, hashed into transaction ids.
    pub fn encode(&self) -> Result<Vec<u8>, crate::FinanceError> {
        bincode::serialize(self).map_err(|e| crate::FinanceError::Codec(e.to_string()))
    }
}
