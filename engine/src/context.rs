//! Per-transaction execution context.

use bill_crypto::hash_transaction;
use bill_types::{Address, Timestamp, TxHash};

use crate::action::FinanceAction;
use crate::FinanceError;

/// What the host ledger tells the engine about the transaction carrying an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxContext {
    /// Hash of the transaction; becomes the id of any handshake or cash request it creates.
    pub tx_hash: TxHash,
    /// The signer.
    pub from: Address,
    /// Block time. The engine never reads the local clock.
    pub block_time: Timestamp,
    pub height: u64,
}

impl TxContext {
    pub fn new(tx_hash: TxHash, from: impl Into<Address>, block_time: Timestamp) -> Self {
        Self {
            tx_hash,
            from: from.into(),
            block_time,
            height: 0,
        }
    }

    /// Context for `action` signed by its declared actor, hashed the way the
    /// host ledger hashes transactions.
    pub fn for_action(
        action: &FinanceAction,
        nonce: u64,
        block_time: Timestamp,
    ) -> Result<Self, FinanceError> {
        let from = action.actor().clone();
        let tx_hash = hash_transaction(from.as_str(), nonce, &action.encode()?);
        Ok(Self {
            tx_hash,
            from,
            block_time,
            height: 0,
        })
    }

    pub fn with_height(mut self, height: u64) -> Self {
        self.height = height;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::DepositAsset;

    fn deposit() -> FinanceAction {
        FinanceAction::DepositAsset(DepositAsset {
            deposit_addr: Address::new("core"),
            symbol: "token.CCNY".into(),
            amount: 10,
            remark: String::new(),
        })
    }

    #[test]
    fn signer_is_the_declared_actor() {
        let ctx = TxContext::for_action(&deposit(), 0, Timestamp::new(5)).unwrap();
        assert_eq!(ctx.from, Address::new("core"));
        assert_eq!(ctx.block_time, Timestamp::new(5));
    }

    #[test]
    fn nonce_changes_the_hash() {
        let a = TxContext::for_action(&deposit(), 0, Timestamp::new(5)).unwrap();
        let b = TxContext::for_action(&deposit(), 1, Timestamp::new(5)).unwrap();
        assert_ne!(a.tx_hash, b.tx_hash);
        let later = TxContext::for_action(&deposit(), 0, Timestamp::new(9)).unwrap();
        assert_eq!(a.tx_hash, later.tx_hash);
    }
}
