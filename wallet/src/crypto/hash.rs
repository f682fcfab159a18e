//! # Hashing Utilities
//!
//! Two hash functions, two jobs:
//!
//! - **BLAKE3** — the native digest. Box ids, script hashes, and the state
//!   context digest all use it.
//! - **SHA-256** — used only in the `double_sha256` construction for
//!   transaction ids.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input data.
///
/// Returns a fixed 32-byte digest. Prefer [`blake3_hash`] for anything
/// wallet-native; this exists to feed [`double_sha256`].
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Compute `SHA-256(SHA-256(data))`.
///
/// The transaction-id construction. The double application closes the
/// length-extension property of plain SHA-256.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute the BLAKE3 hash of the input data.
///
/// The workhorse digest for box ids, script hashes, and context digests.
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        // SHA-256 of the empty string.
        let hash = sha256(b"");
        assert_eq!(
            hex::encode(hash),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn double_sha256_differs_from_single() {
        let data = b"box selection";
        assert_ne!(sha256(data), double_sha256(data));
        assert_eq!(double_sha256(data), sha256(&sha256(data)));
    }

    #[test]
    fn blake3_is_deterministic() {
        assert_eq!(blake3_hash(b"utxo"), blake3_hash(b"utxo"));
        assert_ne!(blake3_hash(b"utxo"), blake3_hash(b"utx0"));
    }
}
