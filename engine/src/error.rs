//! Finance-engine errors.

use bill_interest::InterestError;
use bill_ledger::AssetError;
use bill_store::StoreError;
use bill_types::{Address, BillStatus, Identity, TxHash};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("identity mismatch: expected {expected}, got {actual}")]
    RoleMismatch { expected: Identity, actual: Identity },

    #[error("address mismatch: expected {expected}, got {actual}")]
    AddressMismatch { expected: Address, actual: Address },

    #[error("bill {0} not found")]
    BillNotFound(String),

    #[error("credit token {0} not found")]
    CreditNotFound(String),

    #[error("handshake {0} not found")]
    HandshakeNotFound(TxHash),

    #[error("bill is {actual}, expected {expected}")]
    InvalidState { expected: BillStatus, actual: BillStatus },

    #[error("bill {0} has reached its due date")]
    Expired(String),

    #[error("credit token {0} has expired")]
    CreditExpired(String),

    #[error("insufficient {symbol} on {address}: need {needed}, have {available}")]
    InsufficientAssets {
        address: Address,
        symbol: String,
        needed: u128,
        available: u128,
    },

    #[error("insufficient frozen {symbol} on {address}: need {needed}, have {frozen}")]
    InsufficientFrozen {
        address: Address,
        symbol: String,
        needed: u128,
        frozen: u128,
    },

    #[error("dependent credit {total} does not cover loan amount {loan}")]
    InsufficientDependentCredit { total: u128, loan: u128 },

    #[error("unused credit of {symbol} is {unused}, requested {requested}")]
    UnusedCreditNotEnough {
        symbol: String,
        unused: u128,
        requested: u128,
    },

    #[error("credit token {0} is not pledged by the bill")]
    CreditMismatch(String),

    #[error("bill {0} cannot be split")]
    NotSplittable(String),

    #[error("bill {0} already exists")]
    BillExists(String),

    #[error("tokens of bill {0} have already entered circulation")]
    AlreadyPublished(String),

    #[error("redeemed {redeemed} plus requested {requested} exceeds loan amount {loan}")]
    TotalCashMismatch {
        loan: u128,
        redeemed: u128,
        requested: u128,
    },

    #[error("bill {0} is not yet due")]
    NotYetDue(String),

    #[error("rate must be non-negative, got {0}")]
    NegativeRate(i64),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("discounted token value is zero")]
    WrongTokenValue,

    #[error("arithmetic overflow")]
    Overflow,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("asset ledger error: {0}")]
    Asset(AssetError),
}

impl From<AssetError> for FinanceError {
    fn from(e: AssetError) -> Self {
        match e {
            AssetError::InsufficientAvailable {
                address,
                symbol,
                needed,
                available,
            } => FinanceError::InsufficientAssets {
                address,
                symbol,
                needed,
                available,
            },
            AssetError::InsufficientFrozen {
                address,
                symbol,
                needed,
                frozen,
            } => FinanceError::InsufficientFrozen {
                address,
                symbol,
                needed,
                frozen,
            },
            other => FinanceError::Asset(other),
        }
    }
}

impl From<InterestError> for FinanceError {
    fn from(e: InterestError) -> Self {
        match e {
            InterestError::NegativeRate(r) => FinanceError::NegativeRate(r),
            InterestError::Overflow => FinanceError::Overflow,
        }
    }
}
