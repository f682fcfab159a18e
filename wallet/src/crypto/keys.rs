//! # Key Material
//!
//! Ed25519 secret keys, public keys, and signatures for spending proofs.
//!
//! A [`SecretKey`] is deliberately move-only: no `Clone`, no `Serialize`,
//! no `Debug` output of key bytes. The key enters the core as caller-supplied
//! text, is used to prove inputs, and leaves scope exactly once — the backing
//! crate zeroizes it on drop. If you need two copies of a secret key, you
//! need to rethink your design instead.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::{PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, SIGNATURE_LENGTH};

/// Errors that can occur during key operations.
///
/// Intentionally terse about *why* parsing failed — error messages must not
/// become a side channel for key material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The secret key text is not valid hex or not 32 bytes.
    #[error("invalid secret key: expected {SECRET_KEY_LENGTH} hex-encoded bytes")]
    InvalidSecretKey,

    /// The public key bytes are not a valid Ed25519 point.
    #[error("invalid public key: not a valid Ed25519 point")]
    InvalidPublicKey,
}

// ---------------------------------------------------------------------------
// SecretKey
// ---------------------------------------------------------------------------

/// An Ed25519 secret scalar used to produce spending proofs.
///
/// Owned exclusively by the caller, moved into signing calls by reference,
/// never serialized back out.
pub struct SecretKey {
    signing_key: SigningKey,
}

impl SecretKey {
    /// Generate a fresh secret key from the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Parse a secret key from its hex text representation.
    ///
    /// This is the construction entrypoint the boundary layer uses: 64 hex
    /// characters, 32 bytes, nothing else accepted.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(KeyError::InvalidSecretKey);
        }
        let mut seed = [0u8; SECRET_KEY_LENGTH];
        seed.copy_from_slice(&bytes);
        Ok(Self {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    /// The public half of this key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Sign a message, producing a deterministic Ed25519 signature.
    pub fn sign(&self, message: &[u8]) -> ProofSignature {
        let sig = self.signing_key.sign(message);
        ProofSignature {
            bytes: sig.to_bytes().to_vec(),
        }
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key bytes.
        f.write_str("SecretKey(..)")
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// The public half of a spending key, safe to embed in transactions.
/// Hex-encoded in the JSON exchange format.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

impl Serialize for PublicKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl PublicKey {
    /// Reconstruct a public key from raw bytes, validating the point.
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_LENGTH]) -> Result<Self, KeyError> {
        VerifyingKey::from_bytes(bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes: *bytes })
    }

    /// Parse a public key from hex text.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidPublicKey)?;
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(KeyError::InvalidPublicKey);
        }
        let mut arr = [0u8; PUBLIC_KEY_LENGTH];
        arr.copy_from_slice(&bytes);
        Self::from_bytes(&arr)
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    /// Hex encoding of the key bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Verify a signature over a message against this key.
    ///
    /// Malformed signatures (wrong length, bad point) simply fail
    /// verification; there is no panic path here.
    pub fn verify(&self, message: &[u8], signature: &ProofSignature) -> bool {
        if signature.bytes.len() != SIGNATURE_LENGTH {
            return false;
        }
        let Ok(vk) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let mut sig_bytes = [0u8; SIGNATURE_LENGTH];
        sig_bytes.copy_from_slice(&signature.bytes);
        let sig = DalekSignature::from_bytes(&sig_bytes);
        vk.verify(message, &sig).is_ok()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// ProofSignature
// ---------------------------------------------------------------------------

/// An Ed25519 signature over a spending message.
///
/// Always exactly 64 bytes when produced by [`SecretKey::sign`].
/// Hex-encoded in the JSON exchange format; anything that does not decode
/// to 64 bytes simply fails verification.
#[derive(Clone, PartialEq, Eq)]
pub struct ProofSignature {
    bytes: Vec<u8>,
}

impl Serialize for ProofSignature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ProofSignature {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl ProofSignature {
    /// Parse a signature from hex text.
    pub fn from_hex(hex_str: &str) -> Result<Self, hex::FromHexError> {
        Ok(Self {
            bytes: hex::decode(hex_str)?,
        })
    }

    /// The raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex encoding of the signature bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Debug for ProofSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProofSignature({})", self.to_hex())
    }
}
