//! Chain state context.
//!
//! Signing needs a snapshot of consensus-relevant chain state: the current
//! height and the most recent block headers. The caller supplies it
//! wholesale as JSON (typically relayed from a node), it is parsed and
//! validated exactly once, and from then on it is an immutable value every
//! proof binds to through [`ErgoStateContext::digest`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::crypto::hash::blake3_hash;

/// Errors from context parsing and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The JSON text does not match the context schema.
    #[error("malformed state context: {0}")]
    MalformedContext(String),

    /// The header list is empty; proofs need at least the latest header.
    #[error("malformed state context: last headers must not be empty")]
    EmptyHeaders,

    /// The newest header disagrees with the declared current height.
    #[error(
        "malformed state context: current height {current_height} does not match newest header height {header_height}"
    )]
    HeadHeightMismatch {
        current_height: u32,
        header_height: u32,
    },
}

// ---------------------------------------------------------------------------
// BlockId
// ---------------------------------------------------------------------------

/// A 32-byte block identifier, hex in JSON.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId([u8; 32]);

impl BlockId {
    /// Wrap raw digest bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
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

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.to_hex())
    }
}

impl Serialize for BlockId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlockId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        if bytes.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "block id must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

// ---------------------------------------------------------------------------
// BlockHeader
// ---------------------------------------------------------------------------

/// The consensus-relevant slice of a block header.
///
/// The node's full header carries proofs, roots, and PoW solutions; the
/// wallet only needs the fields that identify the chain tip a proof is
/// anchored to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockHeader {
    /// Header format version.
    pub version: u8,

    /// Identifier of this block.
    pub id: BlockId,

    /// Identifier of the parent block.
    #[serde(rename = "parentId")]
    pub parent_id: BlockId,

    /// Height of this block.
    pub height: u32,

    /// Block timestamp, milliseconds since the UNIX epoch.
    pub timestamp: u64,
}

// ---------------------------------------------------------------------------
// ErgoStateContext
// ---------------------------------------------------------------------------

/// Snapshot of chain parameters needed to produce valid proofs.
///
/// Parsed once from JSON, immutable afterwards. `last_headers` is ordered
/// newest first; the newest header's height must equal `current_height`.
///
/// ```json
/// {
///   "currentHeight": 102,
///   "lastHeaders": [
///     {"version": 1, "id": "…", "parentId": "…", "height": 102, "timestamp": 1693000000000}
///   ]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, try_from = "RawStateContext")]
pub struct ErgoStateContext {
    /// Current chain height.
    #[serde(rename = "currentHeight")]
    current_height: u32,

    /// Recent block headers, newest first.
    #[serde(rename = "lastHeaders")]
    last_headers: Vec<BlockHeader>,
}

/// Unvalidated mirror of the context schema; [`ErgoStateContext`] is only
/// obtainable through its `TryFrom`, so every deserialized context has
/// passed validation.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStateContext {
    #[serde(rename = "currentHeight")]
    current_height: u32,
    #[serde(rename = "lastHeaders")]
    last_headers: Vec<BlockHeader>,
}

impl TryFrom<RawStateContext> for ErgoStateContext {
    type Error = ContextError;

    fn try_from(raw: RawStateContext) -> Result<Self, Self::Error> {
        ErgoStateContext::new(raw.current_height, raw.last_headers)
    }
}

impl ErgoStateContext {
    /// Build a context, validating header presence and head height.
    pub fn new(
        current_height: u32,
        last_headers: Vec<BlockHeader>,
    ) -> Result<Self, ContextError> {
        let head = last_headers.first().ok_or(ContextError::EmptyHeaders)?;
        if head.height != current_height {
            return Err(ContextError::HeadHeightMismatch {
                current_height,
                header_height: head.height,
            });
        }
        Ok(Self {
            current_height,
            last_headers,
        })
    }

    /// Parse a context from its canonical JSON representation.
    pub fn from_json(json: &str) -> Result<Self, ContextError> {
        serde_json::from_str(json).map_err(|e| ContextError::MalformedContext(e.to_string()))
    }

    /// Current chain height.
    pub fn current_height(&self) -> u32 {
        self.current_height
    }

    /// Recent block headers, newest first.
    pub fn last_headers(&self) -> &[BlockHeader] {
        &self.last_headers
    }

    /// BLAKE3 digest of the context, bound into every spending proof.
    ///
    /// Covers the height and every header's identifying fields, so a proof
    /// made against one chain state cannot be replayed against another.
    pub fn digest(&self) -> [u8; 32] {
        let mut buf = Vec::with_capacity(8 + self.last_headers.len() * 80);
        buf.extend_from_slice(&self.current_height.to_le_bytes());
        for header in &self.last_headers {
            buf.push(header.version);
            buf.extend_from_slice(header.id.as_bytes());
            buf.extend_from_slice(header.parent_id.as_bytes());
            buf.extend_from_slice(&header.height.to_le_bytes());
            buf.extend_from_slice(&header.timestamp.to_le_bytes());
        }
        blake3_hash(&buf)
    }
}
