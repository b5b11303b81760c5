//! Nullable store: thread-safe in-memory storage for testing.

use bill_store::{
    AuditStore, BillStore, BrokenRecord, CashRequest, CashRequestStore, CreditStore,
    HandshakeStore, PendingHandshake, RepayRecord, StoreError,
};
use bill_types::{Bill, CreditToken, TxHash};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

/// An in-memory implementation of every store trait the engine needs.
pub struct NullStore {
    bills: Mutex<BTreeMap<String, Bill>>,
    credits: Mutex<BTreeMap<String, CreditToken>>,
    handshakes: Mutex<HashMap<TxHash, PendingHandshake>>,
    cash_requests: Mutex<HashMap<String, Vec<CashRequest>>>,
    repay_records: Mutex<HashMap<String, Vec<RepayRecord>>>,
    broken_records: Mutex<HashMap<String, BrokenRecord>>,
}

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    m.lock().map_err(|e| StoreError::Backend(e.to_string()))
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            bills: Mutex::new(BTreeMap::new()),
            credits: Mutex::new(BTreeMap::new()),
            handshakes: Mutex::new(HashMap::new()),
            cash_requests: Mutex::new(HashMap::new()),
            repay_records: Mutex::new(HashMap::new()),
            broken_records: Mutex::new(HashMap::new()),
        }
    }

    /// Number of live handshakes across all bills.
    pub fn handshake_count(&self) -> usize {
        self.handshakes.lock().map(|h| h.len()).unwrap_or(0)
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BillStore for NullStore {
    fn get_bill(&self, id: &str) -> Result<Bill, StoreError> {
        lock(&self.bills)?
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("bill {id}")))
    }

    fn put_bill(&self, bill: &Bill) -> Result<(), StoreError> {
        lock(&self.bills)?.insert(bill.id.clone(), bill.clone());
        Ok(())
    }

    fn bill_exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(lock(&self.bills)?.contains_key(id))
    }
}

impl CreditStore for NullStore {
    fn get_credit(&self, symbol: &str) -> Result<CreditToken, StoreError> {
        lock(&self.credits)?
            .get(symbol)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("credit {symbol}")))
    }

    fn put_credit(&self, credit: &CreditToken) -> Result<(), StoreError> {
        lock(&self.credits)?.insert(credit.symbol.clone(), credit.clone());
        Ok(())
    }
}

impl HandshakeStore for NullStore {
    fn put_handshake(&self, handshake: &PendingHandshake) -> Result<(), StoreError> {
        let mut map = lock(&self.handshakes)?;
        if map.contains_key(&handshake.id) {
            return Err(StoreError::Duplicate(format!("handshake {}", handshake.id)));
        }
        map.insert(handshake.id, handshake.clone());
        Ok(())
    }

    fn get_handshake(&self, id: &TxHash) -> Result<PendingHandshake, StoreError> {
        lock(&self.handshakes)?
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("handshake {id}")))
    }

    fn delete_handshake(&self, id: &TxHash) -> Result<(), StoreError> {
        lock(&self.handshakes)?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("handshake {id}")))
    }
}

impl CashRequestStore for NullStore {
    fn add_cash_request(&self, request: &CashRequest) -> Result<(), StoreError> {
        lock(&self.cash_requests)?
            .entry(request.bill_id.clone())
            .or_default()
            .push(request.clone());
        Ok(())
    }

    fn cash_requests_for_bill(&self, bill_id: &str) -> Result<Vec<CashRequest>, StoreError> {
        Ok(lock(&self.cash_requests)?
            .get(bill_id)
            .cloned()
            .unwrap_or_default())
    }

    fn remove_cash_request(&self, bill_id: &str, tx_hash: &TxHash) -> Result<(), StoreError> {
        let mut map = lock(&self.cash_requests)?;
        let list = map
            .get_mut(bill_id)
            .ok_or_else(|| StoreError::NotFound(format!("cash list {bill_id}")))?;
        let pos = list
            .iter()
            .position(|r| &r.tx_hash == tx_hash)
            .ok_or_else(|| StoreError::NotFound(format!("cash request {tx_hash}")))?;
        list.remove(pos);
        Ok(())
    }
}

impl AuditStore for NullStore {
    fn append_repay_record(&self, record: &RepayRecord) -> Result<(), StoreError> {
        lock(&self.repay_records)?
            .entry(record.bill_id.clone())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    fn repay_records_for_bill(&self, bill_id: &str) -> Result<Vec<RepayRecord>, StoreError> {
        Ok(lock(&self.repay_records)?
            .get(bill_id)
            .cloned()
            .unwrap_or_default())
    }

    fn put_broken_record(&self, record: &BrokenRecord) -> Result<(), StoreError> {
        lock(&self.broken_records)?.insert(record.bill_id.clone(), record.clone());
        Ok(())
    }

    fn get_broken_record(&self, bill_id: &str) -> Result<Option<BrokenRecord>, StoreError> {
        Ok(lock(&self.broken_records)?.get(bill_id).cloned())
    }

    fn delete_broken_record(&self, bill_id: &str) -> Result<(), StoreError> {
        lock(&self.broken_records)?.remove(bill_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bill_store::HandshakeKind;
    use bill_types::{Address, Timestamp};

    fn test_hash(n: u8) -> TxHash {
        TxHash::new([n; 32])
    }

    fn test_handshake(n: u8) -> PendingHandshake {
        PendingHandshake {
            id: test_hash(n),
            kind: HandshakeKind::Deliver,
            bill_id: "b1".into(),
            proposer: Address::new("core"),
            counterparty: Address::new("supplier"),
            amount: 10,
            timestamp: Timestamp::new(n as u64),
            credit_symbol: None,
            remark: String::new(),
        }
    }

    fn test_cash(n: u8) -> CashRequest {
        CashRequest {
            bill_id: "b1".into(),
            tx_hash: test_hash(n),
            cash_addr: Address::new("supplier"),
            amount: n as u128,
            value: n as u128,
            timestamp: Timestamp::new(n as u64),
        }
    }

    #[test]
    fn duplicate_handshake_rejected() {
        let store = NullStore::new();
        store.put_handshake(&test_handshake(1)).unwrap();
        assert!(matches!(
            store.put_handshake(&test_handshake(1)),
            Err(StoreError::Duplicate(_))
        ));
        assert_eq!(store.handshake_count(), 1);
    }

    #[test]
    fn deleting_missing_handshake_fails() {
        let store = NullStore::new();
        assert!(matches!(
            store.delete_handshake(&test_hash(9)),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn cash_requests_keep_insertion_order() {
        let store = NullStore::new();
        for n in [3, 1, 2] {
            store.add_cash_request(&test_cash(n)).unwrap();
        }
        store.remove_cash_request("b1", &test_hash(1)).unwrap();
        let amounts: Vec<u128> = store
            .cash_requests_for_bill("b1")
            .unwrap()
            .iter()
            .map(|r| r.amount)
            .collect();
        assert_eq!(amounts, vec![3, 2]);
    }

    #[test]
    fn broken_record_upserts() {
        let store = NullStore::new();
        let mut record = BrokenRecord {
            bill_id: "b1".into(),
            tx_hash: test_hash(1),
            reporter: Address::new("x"),
            borrower: Address::new("core"),
            bill_name: String::new(),
            overdue_days: 1,
            overdue_value: 5,
            timestamp: Timestamp::new(1),
        };
        store.put_broken_record(&record).unwrap();
        record.overdue_days = 4;
        store.put_broken_record(&record).unwrap();
        assert_eq!(store.get_broken_record("b1").unwrap().unwrap().overdue_days, 4);
        store.delete_broken_record("b1").unwrap();
        store.delete_broken_record("b1").unwrap();
        assert!(store.get_broken_record("b1").unwrap().is_none());
    }
}
