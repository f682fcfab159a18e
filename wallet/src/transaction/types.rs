//! Transaction structures and the canonical exchange format.
//!
//! An [`UnsignedTransaction`] references its inputs and data inputs by box
//! identity and carries its outputs as candidates. Signing turns it into a
//! [`Transaction`] by attaching a [`SpendingProof`] to every input — and
//! nothing else: the transaction id is `hex(double_sha256(signable_bytes))`
//! over the unsigned form, so the id is stable across signing.
//!
//! The signable byte format is a deterministic concatenation with
//! fixed-width little-endian integers and length prefixes. JSON/serde is
//! deliberately not used for signing input, since field ordering guarantees
//! do not belong in a consensus-critical byte stream.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::ergo_box::{BoxId, ErgoBoxCandidate, TxId};
use crate::crypto::hash::double_sha256;
use crate::crypto::keys::{ProofSignature, PublicKey};

/// Errors from transaction parsing and structural validation.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The JSON text does not match the transaction schema.
    #[error("malformed transaction JSON: {0}")]
    Json(String),

    /// The declared id does not match the double-SHA-256 of the signable bytes.
    #[error("transaction id mismatch: expected {expected}, got {actual}")]
    IdMismatch { expected: String, actual: String },

    /// A transaction with no inputs is not a transaction.
    #[error("transaction has no inputs")]
    NoInputs,

    /// A transaction with no outputs is not a transaction.
    #[error("transaction has no outputs")]
    NoOutputs,
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// An input of an unsigned transaction: a box identity, nothing more.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnsignedInput {
    /// Identity of the box being spent.
    #[serde(rename = "boxId")]
    pub box_id: BoxId,
}

/// A box referenced read-only, without being spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataInput {
    /// Identity of the referenced box.
    #[serde(rename = "boxId")]
    pub box_id: BoxId,
}

/// Authorization attached to a signed input.
///
/// Carries the proof itself plus the prover's public key, so a verifier can
/// check both that the key hashes to the input box's script hash and that
/// the signature verifies — without any key lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpendingProof {
    /// Ed25519 signature over the spending message.
    pub proof: ProofSignature,

    /// Public key the proof was made with.
    #[serde(rename = "publicKey")]
    pub public_key: PublicKey,
}

/// A signed input: box identity plus its authorization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Input {
    /// Identity of the box being spent.
    #[serde(rename = "boxId")]
    pub box_id: BoxId,

    /// Authorization for spending it.
    #[serde(rename = "spendingProof")]
    pub spending_proof: SpendingProof,
}

// ---------------------------------------------------------------------------
// UnsignedTransaction
// ---------------------------------------------------------------------------

/// A fully assembled but not yet authorized transaction.
///
/// Produced by the transaction builder; consumed by the signer. Outputs are
/// final at this point — the change box and fee entry are already in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTransaction {
    /// Inputs, in selection order.
    pub inputs: Vec<UnsignedInput>,

    /// Read-only referenced boxes.
    pub data_inputs: Vec<DataInput>,

    /// Output candidates: requested outputs, then change (if any), then the
    /// fee entry (if any).
    pub outputs: Vec<ErgoBoxCandidate>,
}

impl UnsignedTransaction {
    /// Canonical byte form covering inputs, data inputs, and outputs.
    ///
    /// Every variable-length section is count-prefixed and every candidate
    /// is length-prefixed, so distinct transactions can never share a byte
    /// stream.
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);

        buf.extend_from_slice(&(self.inputs.len() as u32).to_le_bytes());
        for input in &self.inputs {
            buf.extend_from_slice(input.box_id.as_bytes());
        }

        buf.extend_from_slice(&(self.data_inputs.len() as u32).to_le_bytes());
        for data_input in &self.data_inputs {
            buf.extend_from_slice(data_input.box_id.as_bytes());
        }

        buf.extend_from_slice(&(self.outputs.len() as u32).to_le_bytes());
        for output in &self.outputs {
            let bytes = output.signable_bytes();
            buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
            buf.extend_from_slice(&bytes);
        }

        buf
    }

    /// The transaction id: `double_sha256(signable_bytes)`.
    pub fn compute_id(&self) -> TxId {
        TxId::new(double_sha256(&self.signable_bytes()))
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A signed, finalized transaction.
///
/// Immutable once produced, and the only type serialized back to the JSON
/// exchange format. The round trip is exact: parsing the serialized form
/// yields an equal value, field for field, ordering included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transaction {
    /// Transaction id, stable across signing.
    pub id: TxId,

    /// Signed inputs, in the unsigned transaction's order.
    pub inputs: Vec<Input>,

    /// Read-only referenced boxes.
    #[serde(rename = "dataInputs", default, skip_serializing_if = "Vec::is_empty")]
    pub data_inputs: Vec<DataInput>,

    /// Outputs, exactly as assembled by the builder.
    pub outputs: Vec<ErgoBoxCandidate>,
}

impl Transaction {
    /// Reconstruct the unsigned form (for id recomputation and message
    /// derivation).
    pub fn to_unsigned(&self) -> UnsignedTransaction {
        UnsignedTransaction {
            inputs: self
                .inputs
                .iter()
                .map(|i| UnsignedInput { box_id: i.box_id })
                .collect(),
            data_inputs: self.data_inputs.clone(),
            outputs: self.outputs.clone(),
        }
    }

    /// Serialize to the canonical JSON exchange format.
    pub fn to_json(&self) -> Result<String, TransactionError> {
        serde_json::to_string(self).map_err(|e| TransactionError::Json(e.to_string()))
    }

    /// Parse from the canonical JSON exchange format.
    ///
    /// Validates structure (non-empty inputs and outputs) and the id
    /// against the recomputed signable bytes, so a tampered or truncated
    /// transaction fails here rather than at a verifier.
    pub fn from_json(json: &str) -> Result<Self, TransactionError> {
        let tx: Self =
            serde_json::from_str(json).map_err(|e| TransactionError::Json(e.to_string()))?;
        if tx.inputs.is_empty() {
            return Err(TransactionError::NoInputs);
        }
        if tx.outputs.is_empty() {
            return Err(TransactionError::NoOutputs);
        }
        let expected = tx.to_unsigned().compute_id();
        if expected != tx.id {
            return Err(TransactionError::IdMismatch {
                expected: expected.to_hex(),
                actual: tx.id.to_hex(),
            });
        }
        Ok(tx)
    }
}
