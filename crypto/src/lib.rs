//! Hashing primitives for the bill settlement engine.
//!
//! Every action is identified by the Blake2b-256 hash of its encoded
//! transaction. That hash keys the handshakes and cash requests the action
//! creates, so it must be stable across nodes.

pub mod hash;

pub use hash::{blake2b_256, blake2b_256_multi, hash_transaction};
