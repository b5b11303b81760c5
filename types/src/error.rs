//! Top-level error type for primitive parsing and validation.

use thiserror::Error;

/// Errors raised while building or parsing the primitive types of this crate.
#[derive(Debug, Error)]
pub enum BillError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),

    #[error("unknown identity: {0}")]
    UnknownIdentity(String),

    #[error("unknown bill status: {0}")]
    UnknownStatus(String),

    #[error("unknown asset class: {0}")]
    UnknownAssetClass(String),
}
