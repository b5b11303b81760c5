use bill_types::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("insufficient available {symbol} on {address}: need {needed}, have {available}")]
    InsufficientAvailable {
        address: Address,
        symbol: String,
        needed: u128,
        available: u128,
    },

    #[error("insufficient frozen balance of {symbol} on {address}: need {needed}, have {frozen}")]
    InsufficientFrozen {
        address: Address,
        symbol: String,
        needed: u128,
        frozen: u128,
    },

    #[error("unknown asset: {0}")]
    UnknownAsset(String),

    #[error("balance overflow on {0}")]
    Overflow(Address),

    #[error("ledger backend error: {0}")]
    Backend(String),
}
