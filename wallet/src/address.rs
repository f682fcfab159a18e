//! # Addresses
//!
//! A wallet address is the human-facing form of a spending script. It is
//! derived from an Ed25519 public key:
//!
//! ```text
//! public_key (32 bytes)
//!     -> BLAKE3(public_key) -> script hash (32 bytes)
//!     -> Bech32(hrp, script hash) -> ergo1qw508d6qe...
//! ```
//!
//! The human-readable prefix (HRP) carries the network tag: `ergo` for
//! mainnet, `tergo` for testnet. Bech32's checksum detects up to four
//! character errors, which matters when addresses travel through clipboards
//! and payment forms. Parsing always states which network the caller
//! expects, and a mismatched tag is a hard error — a testnet address can
//! never slip into a mainnet transaction.

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::{MAINNET_HRP, SCRIPT_HASH_LENGTH, TESTNET_HRP};
use crate::crypto::hash::blake3_hash;
use crate::crypto::keys::PublicKey;

/// Errors that can occur while parsing or checking addresses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The Bech32 string could not be decoded.
    #[error("bech32 decode error: {0}")]
    Bech32Decode(String),

    /// The HRP is neither the mainnet nor the testnet prefix.
    #[error("unknown network prefix '{0}'")]
    UnknownHrp(String),

    /// The address belongs to a different network than the caller expects.
    #[error("wrong network: expected {expected}, got {got}")]
    WrongNetwork {
        expected: NetworkPrefix,
        got: NetworkPrefix,
    },

    /// The decoded payload has an unexpected length.
    #[error("invalid address data length: expected {expected} bytes, got {got}")]
    InvalidDataLength { expected: usize, got: usize },
}

// ---------------------------------------------------------------------------
// NetworkPrefix
// ---------------------------------------------------------------------------

/// Which network an address belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkPrefix {
    /// The production network.
    Mainnet,
    /// The public test network.
    Testnet,
}

impl NetworkPrefix {
    /// The Bech32 HRP for this network.
    pub fn hrp(&self) -> &'static str {
        match self {
            Self::Mainnet => MAINNET_HRP,
            Self::Testnet => TESTNET_HRP,
        }
    }

    fn from_hrp(hrp: &str) -> Result<Self, AddressError> {
        match hrp {
            MAINNET_HRP => Ok(Self::Mainnet),
            TESTNET_HRP => Ok(Self::Testnet),
            other => Err(AddressError::UnknownHrp(other.to_string())),
        }
    }
}

impl fmt::Display for NetworkPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hrp())
    }
}

// ---------------------------------------------------------------------------
// ScriptHash
// ---------------------------------------------------------------------------

/// The 32-byte BLAKE3 hash of a spending script (here: of the recipient's
/// public key). Boxes reference their guarding script by this hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptHash([u8; SCRIPT_HASH_LENGTH]);

impl ScriptHash {
    /// Wrap raw hash bytes.
    pub fn new(bytes: [u8; SCRIPT_HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// The script hash guarding boxes spendable by `pk`.
    pub fn of_public_key(pk: &PublicKey) -> Self {
        Self(blake3_hash(pk.as_bytes()))
    }

    /// The raw hash bytes.
    pub fn as_bytes(&self) -> &[u8; SCRIPT_HASH_LENGTH] {
        &self.0
    }

    /// Hex encoding of the hash.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a script hash from hex text.
    pub fn from_hex(hex_str: &str) -> Result<Self, AddressError> {
        let bytes =
            hex::decode(hex_str).map_err(|e| AddressError::Bech32Decode(e.to_string()))?;
        if bytes.len() != SCRIPT_HASH_LENGTH {
            return Err(AddressError::InvalidDataLength {
                expected: SCRIPT_HASH_LENGTH,
                got: bytes.len(),
            });
        }
        let mut arr = [0u8; SCRIPT_HASH_LENGTH];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptHash({})", self.to_hex())
    }
}

impl Serialize for ScriptHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ScriptHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A network-tagged wallet address.
///
/// Immutable once constructed: it owns the script hash it was parsed from
/// or derived with, plus its network tag. The Bech32 string form is
/// computed on demand.
///
/// # Examples
///
/// ```
/// use ergo_wallet::address::{Address, NetworkPrefix};
/// use ergo_wallet::crypto::keys::SecretKey;
///
/// let sk = SecretKey::generate();
/// let addr = Address::p2pk(&sk.public_key(), NetworkPrefix::Testnet);
/// let encoded = addr.encode();
/// assert!(encoded.starts_with("tergo1"));
///
/// let recovered = Address::parse(&encoded, NetworkPrefix::Testnet).unwrap();
/// assert_eq!(addr, recovered);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    network: NetworkPrefix,
    script_hash: ScriptHash,
}

impl Address {
    /// Derive the pay-to-public-key address of `pk` on the given network.
    pub fn p2pk(pk: &PublicKey, network: NetworkPrefix) -> Self {
        Self {
            network,
            script_hash: ScriptHash::of_public_key(pk),
        }
    }

    /// Construct an address from a raw script hash.
    pub fn from_script_hash(script_hash: ScriptHash, network: NetworkPrefix) -> Self {
        Self {
            network,
            script_hash,
        }
    }

    /// Parse a Bech32 address string, requiring it to belong to
    /// `expected_network`.
    ///
    /// Validates checksum, HRP, and payload length. A syntactically valid
    /// address on the wrong network fails with
    /// [`AddressError::WrongNetwork`].
    pub fn parse(addr: &str, expected_network: NetworkPrefix) -> Result<Self, AddressError> {
        let (hrp, data) =
            bech32::decode(addr).map_err(|e| AddressError::Bech32Decode(e.to_string()))?;

        let network = NetworkPrefix::from_hrp(hrp.as_str())?;
        if network != expected_network {
            return Err(AddressError::WrongNetwork {
                expected: expected_network,
                got: network,
            });
        }

        if data.len() != SCRIPT_HASH_LENGTH {
            return Err(AddressError::InvalidDataLength {
                expected: SCRIPT_HASH_LENGTH,
                got: data.len(),
            });
        }
        let mut bytes = [0u8; SCRIPT_HASH_LENGTH];
        bytes.copy_from_slice(&data);

        Ok(Self {
            network,
            script_hash: ScriptHash::new(bytes),
        })
    }

    /// Encode this address as a Bech32 string.
    pub fn encode(&self) -> String {
        let hrp = Hrp::parse(self.network.hrp()).expect("static HRP is valid");
        bech32::encode::<Bech32>(hrp, self.script_hash.as_bytes())
            .expect("encoding a 32-byte payload should never fail")
    }

    /// The network this address belongs to.
    pub fn network(&self) -> NetworkPrefix {
        self.network
    }

    /// The script hash this address stands for.
    pub fn script_hash(&self) -> ScriptHash {
        self.script_hash
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::SecretKey;

    #[test]
    fn p2pk_roundtrip_mainnet() {
        let pk = SecretKey::generate().public_key();
        let addr = Address::p2pk(&pk, NetworkPrefix::Mainnet);
        let encoded = addr.encode();
        assert!(encoded.starts_with("ergo1"));
        let recovered = Address::parse(&encoded, NetworkPrefix::Mainnet).unwrap();
        assert_eq!(addr, recovered);
    }

    #[test]
    fn network_mismatch_is_rejected() {
        let pk = SecretKey::generate().public_key();
        let addr = Address::p2pk(&pk, NetworkPrefix::Testnet);
        let err = Address::parse(&addr.encode(), NetworkPrefix::Mainnet).unwrap_err();
        assert_eq!(
            err,
            AddressError::WrongNetwork {
                expected: NetworkPrefix::Mainnet,
                got: NetworkPrefix::Testnet,
            }
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            Address::parse("not an address", NetworkPrefix::Mainnet).unwrap_err(),
            AddressError::Bech32Decode(_)
        ));
    }

    #[test]
    fn unknown_hrp_is_rejected() {
        // A valid Bech32 string with an HRP this wallet does not know.
        let hrp = Hrp::parse("btc").unwrap();
        let s = bech32::encode::<Bech32>(hrp, &[0u8; 32]).unwrap();
        assert!(matches!(
            Address::parse(&s, NetworkPrefix::Mainnet).unwrap_err(),
            AddressError::UnknownHrp(_)
        ));
    }

    #[test]
    fn script_hash_matches_public_key_hash() {
        let pk = SecretKey::generate().public_key();
        let addr = Address::p2pk(&pk, NetworkPrefix::Mainnet);
        assert_eq!(addr.script_hash(), ScriptHash::of_public_key(&pk));
    }

    #[test]
    fn script_hash_hex_roundtrip() {
        let h = ScriptHash::new([7u8; SCRIPT_HASH_LENGTH]);
        assert_eq!(ScriptHash::from_hex(&h.to_hex()).unwrap(), h);
    }
}
