//! Cash-request storage trait.

use crate::StoreError;
use bill_types::{Address, Timestamp, TxHash};
use serde::{Deserialize, Serialize};

/// A holder's irrevocable request to redeem bill tokens for currency.
///
/// The tokens stay frozen on the holder's account until a repayment pass
/// settles the request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashRequest {
    pub bill_id: String,
    pub tx_hash: TxHash,
    /// Token owner, paid on settlement.
    pub cash_addr: Address,
    /// Bill tokens to redeem.
    pub amount: u128,
    /// Present value of `amount` when the request was filed.
    pub value: u128,
    pub timestamp: Timestamp,
}

/// Trait for the per-bill list of pending cash requests.
pub trait CashRequestStore {
    /// Append a request to the bill's list.
    fn add_cash_request(&self, request: &CashRequest) -> Result<(), StoreError>;

    /// Pending requests for a bill, in the order they were filed.
    fn cash_requests_for_bill(&self, bill_id: &str) -> Result<Vec<CashRequest>, StoreError>;

    /// Remove a settled request.
    fn remove_cash_request(&self, bill_id: &str, tx_hash: &TxHash) -> Result<(), StoreError>;
}
