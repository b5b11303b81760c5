//! Static registries: action name ↔ id, log kind → decoder.
//!
//! Ids follow the host ledger's numbering, one past the reserved "unknown"
//! slot at 100. Both tables are immutable and built at compile time.

use serde::{Deserialize, Serialize};

use crate::action::FinanceAction;
use crate::receipt::{
    AssetLog, BillLog, CashLog, ConfirmLog, CreditLog, DecodedLog, HandshakeLog, ReceiptLog,
    RepayLog, TransferLog,
};
use crate::FinanceError;
use bill_store::BrokenRecord;

/// Reserved id for an unrecognised action or log.
pub const UNKNOWN_ID: i32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    AddCreditToken,
    DepositAsset,
    WithdrawlAsset,
    TransferCoins,
    CreateBill,
    ReleaseBill,
    UnReleaseBill,
    ApplyForFinancing,
    UnApplyForFinancing,
    ConfirmFinancing,
    CashBill,
    RepayBill,
    ReportBroken,
    DeliverBill,
    UnDeliverBill,
    ConfirmDeliverBill,
    SplitBill,
    UnSplitBill,
    ConfirmSplitBill,
}

/// Log kinds share the action ordering.
pub type LogKind = ActionKind;

pub struct ActionEntry {
    pub kind: ActionKind,
    pub name: &'static str,
    pub id: i32,
}

pub static ACTION_TABLE: [ActionEntry; 19] = [
    ActionEntry {
        kind: ActionKind::AddCreditToken,
        name: "AddCreditToken",
        id: 101,
    },
    ActionEntry {
        kind: ActionKind::DepositAsset,
        name: "DepositAsset",
        id: 102,
    },
    ActionEntry {
        kind: ActionKind::WithdrawlAsset,
        name: "WithdrawlAsset",
        id: 103,
    },
    ActionEntry {
        kind: ActionKind::TransferCoins,
        name: "TransferCoins",
        id: 104,
    },
    ActionEntry {
        kind: ActionKind::CreateBill,
        name: "CreateBill",
        id: 105,
    },
    ActionEntry {
        kind: ActionKind::ReleaseBill,
        name: "ReleaseBill",
        id: 106,
    },
    ActionEntry {
        kind: ActionKind::UnReleaseBill,
        name: "UnReleaseBill",
        id: 107,
    },
    ActionEntry {
        kind: ActionKind::ApplyForFinancing,
        name: "ApplyForFinancing",
        id: 108,
    },
    ActionEntry {
        kind: ActionKind::UnApplyForFinancing,
        name: "UnApplyForFinancing",
        id: 109,
    },
    ActionEntry {
        kind: ActionKind::ConfirmFinancing,
        name: "ConfirmFinancing",
        id: 110,
    },
    ActionEntry {
        kind: ActionKind::CashBill,
        name: "CashBill",
        id: 111,
    },
    ActionEntry {
        kind: ActionKind::RepayBill,
        name: "RepayBill",
        id: 112,
    },
    ActionEntry {
        kind: ActionKind::ReportBroken,
        name: "ReportBroken",
        id: 113,
    },
    ActionEntry {
        kind: ActionKind::DeliverBill,
        name: "DeliverBill",
        id: 114,
    },
    ActionEntry {
        kind: ActionKind::UnDeliverBill,
        name: "UnDeliverBill",
        id: 115,
    },
    ActionEntry {
        kind: ActionKind::ConfirmDeliverBill,
        name: "ConfirmDeliverBill",
        id: 116,
    },
    ActionEntry {
        kind: ActionKind::SplitBill,
        name: "SplitBill",
        id: 117,
    },
    ActionEntry {
        kind: ActionKind::UnSplitBill,
        name: "UnSplitBill",
        id: 118,
    },
    ActionEntry {
        kind: ActionKind::ConfirmSplitBill,
        name: "ConfirmSplitBill",
        id: 119,
    },
];

type Decoder = fn(&ReceiptLog) -> Result<DecodedLog, FinanceError>;

pub struct LogEntry {
    pub kind: LogKind,
    pub name: &'static str,
    pub decode: Decoder,
}

fn credit(log: &ReceiptLog) -> Result<DecodedLog, FinanceError> {
    log.decode_as::<CreditLog>().map(DecodedLog::Credit)
}

fn asset(log: &ReceiptLog) -> Result<DecodedLog, FinanceError> {
    log.decode_as::<AssetLog>().map(DecodedLog::Asset)
}

fn transfer(log: &ReceiptLog) -> Result<DecodedLog, FinanceError> {
    log.decode_as::<TransferLog>().map(DecodedLog::Transfer)
}

fn bill(log: &ReceiptLog) -> Result<DecodedLog, FinanceError> {
    log.decode_as::<BillLog>().map(DecodedLog::Bill)
}

fn handshake(log: &ReceiptLog) -> Result<DecodedLog, FinanceError> {
    log.decode_as::<HandshakeLog>().map(DecodedLog::Handshake)
}

fn confirm(log: &ReceiptLog) -> Result<DecodedLog, FinanceError> {
    log.decode_as::<ConfirmLog>().map(DecodedLog::Confirm)
}

fn cash(log: &ReceiptLog) -> Result<DecodedLog, FinanceError> {
    log.decode_as::<CashLog>().map(DecodedLog::Cash)
}

fn repay(log: &ReceiptLog) -> Result<DecodedLog, FinanceError> {
    log.decode_as::<RepayLog>().map(DecodedLog::Repay)
}

fn broken(log: &ReceiptLog) -> Result<DecodedLog, FinanceError> {
    log.decode_as::<BrokenRecord>().map(DecodedLog::Broken)
}

pub static LOG_TABLE: [LogEntry; 19] = [
    LogEntry {
        kind: ActionKind::AddCreditToken,
        name: "AddCreditTokenLog",
        decode: credit,
    },
    LogEntry {
        kind: ActionKind::DepositAsset,
        name: "DepositAssetLog",
        decode: asset,
    },
    LogEntry {
        kind: ActionKind::WithdrawlAsset,
        name: "WithdrawlAssetLog",
        decode: asset,
    },
    LogEntry {
        kind: ActionKind::TransferCoins,
        name: "TransferCoinsLog",
        decode: transfer,
    },
    LogEntry {
        kind: ActionKind::CreateBill,
        name: "CreateBillLog",
        decode: bill,
    },
    LogEntry {
        kind: ActionKind::ReleaseBill,
        name: "ReleaseBillLog",
        decode: bill,
    },
    LogEntry {
        kind: ActionKind::UnReleaseBill,
        name: "UnReleaseBillLog",
        decode: bill,
    },
    LogEntry {
        kind: ActionKind::ApplyForFinancing,
        name: "ApplyForFinancingLog",
        decode: handshake,
    },
    LogEntry {
        kind: ActionKind::UnApplyForFinancing,
        name: "UnApplyForFinancingLog",
        decode: handshake,
    },
    LogEntry {
        kind: ActionKind::ConfirmFinancing,
        name: "ConfirmFinancingLog",
        decode: confirm,
    },
    LogEntry {
        kind: ActionKind::CashBill,
        name: "CashBillLog",
        decode: cash,
    },
    LogEntry {
        kind: ActionKind::RepayBill,
        name: "RepayBillLog",
        decode: repay,
    },
    LogEntry {
        kind: ActionKind::ReportBroken,
        name: "ReportBrokenLog",
        decode: broken,
    },
    LogEntry {
        kind: ActionKind::DeliverBill,
        name: "DeliverBillLog",
        decode: handshake,
    },
    LogEntry {
        kind: ActionKind::UnDeliverBill,
        name: "UnDeliverBillLog",
        decode: handshake,
    },
    LogEntry {
        kind: ActionKind::ConfirmDeliverBill,
        name: "ConfirmDeliverBillLog",
        decode: confirm,
    },
    LogEntry {
        kind: ActionKind::SplitBill,
        name: "SplitBillLog",
        decode: handshake,
    },
    LogEntry {
        kind: ActionKind::UnSplitBill,
        name: "UnSplitBillLog",
        decode: handshake,
    },
    LogEntry {
        kind: ActionKind::ConfirmSplitBill,
        name: "ConfirmSplitBillLog",
        decode: confirm,
    },
];

impl ActionKind {
    fn entry(&self) -> &'static ActionEntry {
        // The table is declared in enum order.
        &ACTION_TABLE[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.entry().name
    }

    pub fn id(&self) -> i32 {
        self.entry().id
    }

    pub fn log_name(&self) -> &'static str {
        LOG_TABLE[*self as usize].name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ACTION_TABLE.iter().find(|e| e.name == name).map(|e| e.kind)
    }

    pub fn from_id(id: i32) -> Option<Self> {
        ACTION_TABLE.iter().find(|e| e.id == id).map(|e| e.kind)
    }
}

/// Decode a log with the decoder registered for its kind.
pub fn decode_log(log: &ReceiptLog) -> Result<DecodedLog, FinanceError> {
    (LOG_TABLE[log.kind as usize].decode)(log)
}

/// Build an action from its registered name and a JSON payload.
pub fn action_from_json(
    name: &str,
    payload: serde_json::Value,
) -> Result<FinanceAction, FinanceError> {
    let kind = ActionKind::from_name(name)
        .ok_or_else(|| FinanceError::InvalidParameter(format!("unknown action {name}")))?;
    let mut tagged = serde_json::Map::new();
    tagged.insert(kind.name().to_string(), payload);
    serde_json::from_value(serde_json::Value::Object(tagged))
        .map_err(|e| FinanceError::Codec(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::{AssetLog, Receipt};
    use bill_types::{Address, AssetClass, TxHash};

    #[test]
    fn tables_follow_enum_order() {
        for (i, entry) in ACTION_TABLE.iter().enumerate() {
            assert_eq!(entry.kind as usize, i);
            assert_eq!(entry.id, UNKNOWN_ID + 1 + i as i32);
            assert_eq!(LOG_TABLE[i].kind, entry.kind);
            assert_eq!(entry.kind.log_name(), format!("{}Log", entry.name));
        }
    }

    #[test]
    fn name_and_id_lookups_agree() {
        assert_eq!(ActionKind::from_name("RepayBill"), Some(ActionKind::RepayBill));
        assert_eq!(ActionKind::RepayBill.id(), 112);
        assert_eq!(ActionKind::from_id(119), Some(ActionKind::ConfirmSplitBill));
        assert_eq!(ActionKind::from_id(UNKNOWN_ID), None);
        assert_eq!(ActionKind::from_name("Nope"), None);
    }

    #[test]
    fn decodes_through_the_table() {
        let mut receipt = Receipt::new(ActionKind::DepositAsset, TxHash::ZERO);
        let payload = AssetLog {
            addr: Address::new("a"),
            class: AssetClass::Coins,
            symbol: "token.CCNY".into(),
            amount: 9,
            remark: String::new(),
        };
        receipt.push_log(ActionKind::DepositAsset, &payload).unwrap();
        assert_eq!(decode_log(&receipt.logs[0]).unwrap(), DecodedLog::Asset(payload));
    }

    #[test]
    fn builds_actions_from_json() {
        let action = action_from_json(
            "RepayBill",
            serde_json::json!({ "repay_addr": "core", "bill_id": "b1" }),
        )
        .unwrap();
        assert_eq!(action.kind(), ActionKind::RepayBill);
        assert!(action_from_json("Teleport", serde_json::json!({})).is_err());
    }
}
