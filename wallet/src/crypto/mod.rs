//! # Cryptographic Primitives
//!
//! Hashing and key material for the wallet core. Nothing in here touches
//! the network or the filesystem; keys arrive as caller-supplied text and
//! digests are pure functions of their input.

pub mod hash;
pub mod keys;

pub use hash::{blake3_hash, double_sha256, sha256};
pub use keys::{KeyError, ProofSignature, PublicKey, SecretKey};
