//! Credit-registry storage trait.

use crate::StoreError;
use bill_types::CreditToken;

/// One record per credit token, keyed by symbol. Re-adding overwrites.
pub trait CreditStore {
    fn get_credit(&self, symbol: &str) -> Result<CreditToken, StoreError>;
    fn put_credit(&self, credit: &CreditToken) -> Result<(), StoreError>;
}
