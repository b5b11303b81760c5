//! Execution receipts and the typed logs they carry.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use bill_ledger::SettlementDelta;
use bill_store::{BrokenRecord, CashRequest, PendingHandshake, RepayRecord};
use bill_types::{Address, AssetClass, Bill, Timestamp, TxHash};

use crate::dispatch::{ActionKind, LogKind};
use crate::FinanceError;

/// One value movement, as reported to indexers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferTag {
    pub from: Address,
    pub to: Address,
    pub symbol: String,
    pub amount: u128,
    /// The handshake or cash-request hash the movement settles, if any.
    pub remark: String,
}

/// A typed log entry, encoded with bincode under its numeric kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLog {
    pub kind: LogKind,
    pub payload: Vec<u8>,
}

impl ReceiptLog {
    pub fn encode<T: Serialize>(kind: LogKind, payload: &T) -> Result<Self, FinanceError> {
        let payload = bincode::serialize(payload).map_err(|e| FinanceError::Codec(e.to_string()))?;
        Ok(Self { kind, payload })
    }

    pub fn decode_as<T: DeserializeOwned>(&self) -> Result<T, FinanceError> {
        bincode::deserialize(&self.payload).map_err(|e| FinanceError::Codec(e.to_string()))
    }
}

/// Outcome of one successful action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub action: ActionKind,
    pub tx_hash: TxHash,
    /// The bill after the action, when the action touched one.
    pub bill: Option<Bill>,
    pub transfers: Vec<TransferTag>,
    /// Balance changes reported by the asset ledger, in call order.
    pub deltas: Vec<SettlementDelta>,
    pub logs: Vec<ReceiptLog>,
}

impl Receipt {
    pub fn new(action: ActionKind, tx_hash: TxHash) -> Self {
        Self {
            action,
            tx_hash,
            bill: None,
            transfers: Vec::new(),
            deltas: Vec::new(),
            logs: Vec::new(),
        }
    }

    pub fn with_bill(mut self, bill: &Bill) -> Self {
        self.bill = Some(bill.clone());
        self
    }

    pub fn push_log<T: Serialize>(
        &mut self,
        kind: LogKind,
        payload: &T,
    ) -> Result<(), FinanceError> {
        self.logs.push(ReceiptLog::encode(kind, payload)?);
        Ok(())
    }

    /// Transfers whose symbol matches, e.g. every currency payout.
    pub fn transfers_of<'a>(
        &'a self,
        symbol: &'a str,
    ) -> impl Iterator<Item = &'a TransferTag> + 'a {
        self.transfers.iter().filter(move |t| t.symbol == symbol)
    }
}

// ── Log payloads ────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditLog {
    pub symbol: String,
    pub credit_addr: Address,
    pub grantee_addr: Address,
    pub amount: u128,
    pub expire: Timestamp,
    pub transfers: Vec<TransferTag>,
}

/// Deposit and withdrawal notices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLog {
    pub addr: Address,
    pub class: AssetClass,
    pub symbol: String,
    pub amount: u128,
    pub remark: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferLog {
    pub transfers: Vec<TransferTag>,
}

/// Create, release and un-release snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillLog {
    pub bill: Bill,
}

/// A handshake proposed or cancelled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakeLog {
    pub handshake: PendingHandshake,
}

/// A handshake resolved by its counterparty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmLog {
    pub handshake_id: TxHash,
    pub ack: bool,
    pub transfers: Vec<TransferTag>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashLog {
    pub record: CashRequest,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepayLog {
    pub record: RepayRecord,
    pub transfers: Vec<TransferTag>,
}

/// Any log payload, decoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DecodedLog {
    Credit(CreditLog),
    Asset(AssetLog),
    Transfer(TransferLog),
    Bill(BillLog),
    Handshake(HandshakeLog),
    Confirm(ConfirmLog),
    Cash(CashLog),
    Repay(RepayLog),
    Broken(BrokenRecord),
}
