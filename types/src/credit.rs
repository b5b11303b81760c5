//! Credit-registry entry.

use serde::{Deserialize, Serialize};

use crate::{Address, Timestamp};

/// A Funder's credit extension to a Core enterprise, keyed by `symbol`.
///
/// The credit itself is a fungible token transferred to the grantee when the
/// entry is added; bills pledge it as backing for their face value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditToken {
    pub symbol: String,
    /// The Funder extending the credit.
    pub credit_addr: Address,
    /// The Core enterprise receiving it.
    pub grantee_addr: Address,
    pub amount: u128,
    /// Discount rate applied when financing against this credit, scaled by 1e8.
    pub rate: i64,
    pub add_time: Timestamp,
    /// Validity window in seconds, starting at `add_time`.
    pub duration: u64,
    pub remark: String,
}

impl CreditToken {
    pub fn expires_at(&self) -> Timestamp {
        self.add_time.plus(self.duration)
    }

    /// A credit has lapsed once `now` is strictly past its expiry.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at()
    }
}
