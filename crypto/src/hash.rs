//! Blake2b hashing for transactions.

use bill_types::TxHash;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash an encoded transaction, salted with its sender and nonce.
///
/// Two identical payloads sent by the same account still get distinct
/// hashes as long as their nonces differ.
pub fn hash_transaction(sender: &str, nonce: u64, payload: &[u8]) -> TxHash {
    TxHash::new(blake2b_256_multi(&[
        sender.as_bytes(),
        &nonce.to_le_bytes(),
        payload,
    ]))
}
