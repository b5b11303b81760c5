//! Pending handshake storage trait.

use crate::StoreError;
use bill_types::{Address, Timestamp, TxHash};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which two-phase exchange a handshake belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandshakeKind {
    /// Core → Supplier.
    Deliver,
    /// Supplier → Supplier.
    Split,
    /// Supplier → Funder, against a dependent credit.
    Financing,
}

impl fmt::Display for HandshakeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Deliver => "deliver",
            Self::Split => "split",
            Self::Financing => "financing",
        })
    }
}

/// A proposal whose bill tokens are frozen, awaiting the counterparty.
///
/// Created once by the proposing action and deleted once by the matching
/// confirm or cancel. Never mutated in between.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingHandshake {
    /// Hash of the proposing transaction.
    pub id: TxHash,
    pub kind: HandshakeKind,
    pub bill_id: String,
    pub proposer: Address,
    pub counterparty: Address,
    pub amount: u128,
    pub timestamp: Timestamp,
    /// Dependent-credit symbol reserved by a financing proposal.
    #[serde(default)]
    pub credit_symbol: Option<String>,
    #[serde(default)]
    pub remark: String,
}

/// Trait for live handshakes, keyed by the proposing transaction's hash.
pub trait HandshakeStore {
    /// Insert a new handshake. Fails with [`StoreError::Duplicate`] if the id is live.
    fn put_handshake(&self, handshake: &PendingHandshake) -> Result<(), StoreError>;

    fn get_handshake(&self, id: &TxHash) -> Result<PendingHandshake, StoreError>;

    /// Delete a handshake once it has been confirmed or cancelled.
    fn delete_handshake(&self, id: &TxHash) -> Result<(), StoreError>;
}
