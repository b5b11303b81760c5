//! Abstract storage traits for the bill settlement engine.
//!
//! Every storage backend (the host ledger's state database, in-memory for
//! testing) implements these traits. The engine depends only on the traits.

pub mod audit;
pub mod bill;
pub mod cash;
pub mod credit;
pub mod error;
pub mod handshake;

pub use audit::{AuditStore, BrokenRecord, RepayRecord};
pub use bill::BillStore;
pub use cash::{CashRequest, CashRequestStore};
pub use credit::CreditStore;
pub use error::StoreError;
pub use handshake::{HandshakeKind, HandshakeStore, PendingHandshake};

/// Everything the settlement engine persists, behind one bound.
pub trait FinanceStore:
    BillStore + CreditStore + HandshakeStore + CashRequestStore + AuditStore
{
}

impl<T> FinanceStore for T where
    T: BillStore + CreditStore + HandshakeStore + CashRequestStore + AuditStore
{
}
