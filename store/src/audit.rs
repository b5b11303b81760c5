//! Append-only audit records.

use crate::StoreError;
use bill_types::{Address, Timestamp, TxHash};
use serde::{Deserialize, Serialize};

/// Outcome of one repayment pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepayRecord {
    pub bill_id: String,
    pub tx_hash: TxHash,
    pub repay_addr: Address,
    pub timestamp: Timestamp,
    /// Currency paid out during the pass.
    pub value: u128,
    /// Cash requests settled during the pass.
    pub cash_hashes: Vec<TxHash>,
    /// Whether the pass redeemed the last outstanding token.
    pub arrears_cleared: bool,
}

/// A default report against a matured, unsettled bill.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenRecord {
    pub bill_id: String,
    pub tx_hash: TxHash,
    pub reporter: Address,
    pub borrower: Address,
    #[serde(default)]
    pub bill_name: String,
    pub overdue_days: u64,
    /// Overdue interest owed on the outstanding cash requests.
    pub overdue_value: u128,
    pub timestamp: Timestamp,
}

/// Trait for repay history and the broken-bill list.
pub trait AuditStore {
    fn append_repay_record(&self, record: &RepayRecord) -> Result<(), StoreError>;
    fn repay_records_for_bill(&self, bill_id: &str) -> Result<Vec<RepayRecord>, StoreError>;

    /// Insert or replace the broken record for `record.bill_id`.
    fn put_broken_record(&self, record: &BrokenRecord) -> Result<(), StoreError>;
    fn get_broken_record(&self, bill_id: &str) -> Result<Option<BrokenRecord>, StoreError>;
    /// Remove the broken record for a bill. Removing an absent record is not an error.
    fn delete_broken_record(&self, bill_id: &str) -> Result<(), StoreError>;
}
