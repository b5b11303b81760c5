//! Bill engine: the trade-finance settlement state machine.
//!
//! A core enterprise issues a bill backed by credit a funder extended to it.
//! Suppliers receive the bill's tokens, pass them on, split them, sell them to
//! the funder at a discount, or cash them in. At maturity the core repays every
//! cash request and the redeemed tokens are burned.
//!
//! This crate handles:
//! - The credit registry and plain asset movements
//! - Bill creation, release and withdrawal
//! - Deliver, split and financing handshakes
//! - Cash requests, repayment and broken-promise reports
//!
//! Balances live in an external [`bill_ledger::AssetLedger`]; records live in a
//! [`bill_store::FinanceStore`]. Every ledger call an action makes is journaled
//! and undone if the action fails.

pub mod action;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod journal;
pub mod receipt;

mod asset;
mod bill;
mod broken;
mod cash;
mod credit;
mod handshake;
mod repay;

pub use action::{
    AddCreditToken, ApplyForFinancing, CashBill, ConfirmDeliverBill, ConfirmFinancing,
    ConfirmSplitBill, CreateBill, CreditPledge, DeliverBill, DepositAsset, FinanceAction,
    ReleaseBill, RepayBill, ReportBroken, SplitBill, TransferCoins, UnApplyForFinancing,
    UnDeliverBill, UnReleaseBill, UnSplitBill, WithdrawlAsset,
};
pub use config::EngineConfig;
pub use context::TxContext;
pub use dispatch::{action_from_json, decode_log, ActionKind, LogKind};
pub use engine::FinanceEngine;
pub use error::FinanceError;
pub use journal::LedgerJournal;
pub use receipt::{DecodedLog, Receipt, ReceiptLog, TransferTag};
