//! The box model.
//!
//! A *box* is a UTXO-style output: a value, an ordered token list, a
//! guarding script (referenced by hash), optional registers, and a creation
//! height. Before a transaction is finalized its outputs exist as
//! [`ErgoBoxCandidate`]s — boxes without an on-chain identity. An
//! [`UnspentBox`] is a box that made it on chain and is eligible for
//! selection: a candidate plus its identity (creating transaction id and
//! output index) and the height of the block that included it.
//!
//! Everything here is immutable once constructed and parsed eagerly:
//! structural problems in caller-supplied JSON surface at parse time, not
//! halfway through building a transaction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::address::{Address, ScriptHash};
use crate::chain::amount::{ArithmeticError, BoxValue};
use crate::chain::token::Token;
use crate::config::{BOX_ID_LENGTH, MAX_TOKENS_PER_BOX};

/// Errors from box construction and parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoxError {
    /// Token slot bound or amount arithmetic violation.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    /// The same token id appears twice in one box.
    #[error("duplicate token id in box: {0}")]
    DuplicateTokenId(crate::chain::token::TokenId),

    /// A 32-byte digest field could not be parsed.
    #[error("invalid digest: {0}")]
    InvalidDigest(String),
}

/// Per-box token list invariants: unique ids, slot bound respected.
///
/// Applied at every construction path, including deserialization, so a box
/// with a repeated token id can never exist as a value.
fn check_assets(assets: &[Token]) -> Result<(), BoxError> {
    if assets.len() > MAX_TOKENS_PER_BOX {
        return Err(ArithmeticError::too_many_tokens(assets.len()).into());
    }
    for (i, token) in assets.iter().enumerate() {
        if assets[..i].iter().any(|t| t.token_id == token.token_id) {
            return Err(BoxError::DuplicateTokenId(token.token_id));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Digest identities
// ---------------------------------------------------------------------------

/// The identity of an on-chain box: a 32-byte digest, hex in JSON.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoxId([u8; BOX_ID_LENGTH]);

impl BoxId {
    /// Wrap raw digest bytes.
    pub fn new(bytes: [u8; BOX_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse a box id from hex text.
    pub fn from_hex(hex_str: &str) -> Result<Self, BoxError> {
        let bytes = hex::decode(hex_str).map_err(|e| BoxError::InvalidDigest(e.to_string()))?;
        if bytes.len() != BOX_ID_LENGTH {
            return Err(BoxError::InvalidDigest(format!(
                "box id must be {} bytes, got {}",
                BOX_ID_LENGTH,
                bytes.len()
            )));
        }
        let mut arr = [0u8; BOX_ID_LENGTH];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; BOX_ID_LENGTH] {
        &self.0
    }

    /// Hex encoding of the id.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoxId({})", self.to_hex())
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for BoxId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BoxId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// The identity of a transaction: a 32-byte digest, hex in JSON.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxId([u8; 32]);

impl TxId {
    /// Wrap raw digest bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a transaction id from hex text.
    pub fn from_hex(hex_str: &str) -> Result<Self, BoxError> {
        let bytes = hex::decode(hex_str).map_err(|e| BoxError::InvalidDigest(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(BoxError::InvalidDigest(format!(
                "transaction id must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex encoding of the id.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", self.to_hex())
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for TxId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TxId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Registers
// ---------------------------------------------------------------------------

/// Identifier of an optional box register, R4 through R9.
///
/// R0–R3 are mandatory (value, script, tokens, creation info) and are
/// modeled as struct fields, so only the non-mandatory range appears here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NonMandatoryRegisterId {
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
}

impl NonMandatoryRegisterId {
    /// The register's name, as used in the JSON exchange format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::R4 => "R4",
            Self::R5 => "R5",
            Self::R6 => "R6",
            Self::R7 => "R7",
            Self::R8 => "R8",
            Self::R9 => "R9",
        }
    }

    /// Parse a register name.
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s {
            "R4" => Some(Self::R4),
            "R5" => Some(Self::R5),
            "R6" => Some(Self::R6),
            "R7" => Some(Self::R7),
            "R8" => Some(Self::R8),
            "R9" => Some(Self::R9),
            _ => None,
        }
    }

    /// Byte tag used in the canonical binary form.
    pub fn tag(&self) -> u8 {
        match self {
            Self::R4 => 4,
            Self::R5 => 5,
            Self::R6 => 6,
            Self::R7 => 7,
            Self::R8 => 8,
            Self::R9 => 9,
        }
    }
}

impl fmt::Display for NonMandatoryRegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NonMandatoryRegisterId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NonMandatoryRegisterId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str_name(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown register id '{s}'")))
    }
}

/// Opaque register payload: raw bytes, hex in JSON.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterValue(Vec<u8>);

impl RegisterValue {
    /// Wrap raw payload bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The raw payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Hex encoding of the payload.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for RegisterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegisterValue({})", self.to_hex())
    }
}

impl Serialize for RegisterValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RegisterValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s)
            .map(Self)
            .map_err(|e| serde::de::Error::custom(format!("register value is not hex: {e}")))
    }
}

/// Ordered register map. `BTreeMap` keeps R4..R9 in canonical order for
/// both serialization and the signable byte form.
pub type Registers = BTreeMap<NonMandatoryRegisterId, RegisterValue>;

// ---------------------------------------------------------------------------
// ErgoBoxCandidate
// ---------------------------------------------------------------------------

/// An output box under construction: everything an on-chain box has except
/// its identity, which it only gains once the enclosing transaction is
/// included in a block.
///
/// Deserialization goes through a validated raw mirror, so parsed
/// candidates satisfy the same token invariants as constructed ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoxCandidate")]
pub struct ErgoBoxCandidate {
    /// Native value carried by the box.
    pub value: BoxValue,

    /// Hash of the script guarding the box.
    #[serde(rename = "scriptHash")]
    pub script_hash: ScriptHash,

    /// Height the box claims to be created at. Must be monotonic with
    /// respect to the inputs that fund it.
    #[serde(rename = "creationHeight")]
    pub creation_height: u32,

    /// Ordered token list, unique by token id.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<Token>,

    /// Optional R4..R9 registers.
    #[serde(
        rename = "additionalRegisters",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub additional_registers: Registers,
}

impl ErgoBoxCandidate {
    /// Build a candidate, validating the token list.
    pub fn new(
        value: BoxValue,
        script_hash: ScriptHash,
        creation_height: u32,
        assets: Vec<Token>,
        additional_registers: Registers,
    ) -> Result<Self, BoxError> {
        check_assets(&assets)?;
        Ok(Self {
            value,
            script_hash,
            creation_height,
            assets,
            additional_registers,
        })
    }

    /// The common case: a plain payment to an address, no tokens, no
    /// registers.
    pub fn pay_to_address(recipient: &Address, value: BoxValue, creation_height: u32) -> Self {
        Self {
            value,
            script_hash: recipient.script_hash(),
            creation_height,
            assets: Vec::new(),
            additional_registers: BTreeMap::new(),
        }
    }

    /// Canonical binary form, used inside the transaction's signable bytes.
    ///
    /// Fixed-width little-endian integers, length-prefixed variable parts,
    /// registers in ascending id order.
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(&self.value.raw().to_le_bytes());
        buf.extend_from_slice(&self.creation_height.to_le_bytes());
        buf.extend_from_slice(self.script_hash.as_bytes());

        buf.extend_from_slice(&(self.assets.len() as u32).to_le_bytes());
        for token in &self.assets {
            buf.extend_from_slice(token.token_id.as_bytes());
            buf.extend_from_slice(&token.amount.raw().to_le_bytes());
        }

        buf.extend_from_slice(&(self.additional_registers.len() as u32).to_le_bytes());
        for (id, value) in &self.additional_registers {
            buf.push(id.tag());
            buf.extend_from_slice(&(value.as_bytes().len() as u32).to_le_bytes());
            buf.extend_from_slice(value.as_bytes());
        }

        buf
    }
}

/// Unvalidated mirror of the candidate schema; [`ErgoBoxCandidate`] is only
/// obtainable through its `TryFrom`, so every deserialized candidate has
/// passed the token invariants.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBoxCandidate {
    value: BoxValue,
    #[serde(rename = "scriptHash")]
    script_hash: ScriptHash,
    #[serde(rename = "creationHeight")]
    creation_height: u32,
    #[serde(default)]
    assets: Vec<Token>,
    #[serde(rename = "additionalRegisters", default)]
    additional_registers: Registers,
}

impl TryFrom<RawBoxCandidate> for ErgoBoxCandidate {
    type Error = BoxError;

    fn try_from(raw: RawBoxCandidate) -> Result<Self, Self::Error> {
        Self::new(
            raw.value,
            raw.script_hash,
            raw.creation_height,
            raw.assets,
            raw.additional_registers,
        )
    }
}

// ---------------------------------------------------------------------------
// UnspentBox
// ---------------------------------------------------------------------------

/// An on-chain box eligible for selection.
///
/// Owned by the caller's wallet state; the core treats it as read-only
/// input. The JSON schema matches the node's box representation:
///
/// ```json
/// {
///   "boxId": "…64 hex chars…",
///   "value": 100000000,
///   "scriptHash": "…64 hex chars…",
///   "creationHeight": 100,
///   "assets": [{"tokenId": "…", "amount": 5}],
///   "additionalRegisters": {"R4": "deadbeef"},
///   "transactionId": "…64 hex chars…",
///   "index": 0,
///   "inclusionHeight": 101
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawUnspentBox")]
pub struct UnspentBox {
    /// On-chain identity of the box.
    #[serde(rename = "boxId")]
    pub box_id: BoxId,

    /// Native value carried by the box.
    pub value: BoxValue,

    /// Hash of the script guarding the box.
    #[serde(rename = "scriptHash")]
    pub script_hash: ScriptHash,

    /// Height the box was created at.
    #[serde(rename = "creationHeight")]
    pub creation_height: u32,

    /// Ordered token list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<Token>,

    /// Optional R4..R9 registers.
    #[serde(
        rename = "additionalRegisters",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub additional_registers: Registers,

    /// Id of the transaction that created this box.
    #[serde(rename = "transactionId")]
    pub transaction_id: TxId,

    /// Output index within the creating transaction.
    pub index: u16,

    /// Height of the block that included the creating transaction.
    #[serde(rename = "inclusionHeight")]
    pub inclusion_height: u32,
}

impl UnspentBox {
    /// Parse a single unspent box from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Unvalidated mirror of the unspent box schema, same pattern as
/// [`RawBoxCandidate`].
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawUnspentBox {
    #[serde(rename = "boxId")]
    box_id: BoxId,
    value: BoxValue,
    #[serde(rename = "scriptHash")]
    script_hash: ScriptHash,
    #[serde(rename = "creationHeight")]
    creation_height: u32,
    #[serde(default)]
    assets: Vec<Token>,
    #[serde(rename = "additionalRegisters", default)]
    additional_registers: Registers,
    #[serde(rename = "transactionId")]
    transaction_id: TxId,
    index: u16,
    #[serde(rename = "inclusionHeight")]
    inclusion_height: u32,
}

impl TryFrom<RawUnspentBox> for UnspentBox {
    type Error = BoxError;

    fn try_from(raw: RawUnspentBox) -> Result<Self, Self::Error> {
        check_assets(&raw.assets)?;
        Ok(Self {
            box_id: raw.box_id,
            value: raw.value,
            script_hash: raw.script_hash,
            creation_height: raw.creation_height,
            assets: raw.assets,
            additional_registers: raw.additional_registers,
            transaction_id: raw.transaction_id,
            index: raw.index,
            inclusion_height: raw.inclusion_height,
        })
    }
}
