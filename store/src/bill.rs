//! Bill storage trait.

use crate::StoreError;
use bill_types::Bill;

/// One record per bill, keyed by bill id.
pub trait BillStore {
    fn get_bill(&self, id: &str) -> Result<Bill, StoreError>;
    fn put_bill(&self, bill: &Bill) -> Result<(), StoreError>;
    fn bill_exists(&self, id: &str) -> Result<bool, StoreError>;
}
