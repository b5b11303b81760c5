//! Interest-specific errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterestError {
    #[error("rate must be non-negative, got {0}")]
    NegativeRate(i64),

    #[error("arithmetic overflow in interest computation")]
    Overflow,
}
