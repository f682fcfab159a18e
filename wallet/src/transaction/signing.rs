//! Per-input proof production and verification.
//!
//! Signing is all-or-nothing: either every input of the unsigned
//! transaction can be proved with the supplied secret key, or the whole
//! operation fails and no [`Transaction`] value ever exists half-signed.
//! Each input moves through `Unsigned → Proving → Proved` independently,
//! and the first input that cannot be proved aborts the run with its index.
//!
//! The spending message for input `i` binds three things together:
//!
//! ```text
//! message_i = domain_tag || tx_id || context_digest || box_id_i
//! ```
//!
//! so a proof is only valid for this exact transaction, against this exact
//! chain state, for this exact box. Proving is pure and stateless — there
//! is nothing to retry at this layer.

use thiserror::Error;
use tracing::debug;

use crate::address::ScriptHash;
use crate::chain::context::ErgoStateContext;
use crate::chain::ergo_box::{BoxId, UnspentBox};
use crate::crypto::keys::SecretKey;
use crate::transaction::types::{Input, SpendingProof, Transaction, UnsignedTransaction};

/// Domain separation tag for spending messages.
const SPENDING_MESSAGE_TAG: &[u8] = b"ergo-wallet.input-proof.v1";

/// Errors from proof production and verification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// An input could not be proved with the supplied key.
    #[error("signing failed for input {input_index}: {reason}")]
    SigningFailed { input_index: usize, reason: String },

    /// An input references a box that was not supplied to the signer.
    #[error("input box {0} not found among the supplied boxes")]
    MissingInputBox(BoxId),

    /// Verification: the declared id does not match the signable bytes.
    #[error("transaction id does not match its contents")]
    IdMismatch,

    /// Verification: an input's proof does not verify.
    #[error("proof for input {input_index} is invalid")]
    InvalidProof { input_index: usize },
}

fn spending_message(
    tx_id: &crate::chain::ergo_box::TxId,
    context: &ErgoStateContext,
    box_id: &BoxId,
) -> Vec<u8> {
    let mut msg = Vec::with_capacity(SPENDING_MESSAGE_TAG.len() + 96);
    msg.extend_from_slice(SPENDING_MESSAGE_TAG);
    msg.extend_from_slice(tx_id.as_bytes());
    msg.extend_from_slice(&context.digest());
    msg.extend_from_slice(box_id.as_bytes());
    msg
}

fn find_box<'a>(boxes: &'a [UnspentBox], box_id: &BoxId) -> Result<&'a UnspentBox, SigningError> {
    boxes
        .iter()
        .find(|b| &b.box_id == box_id)
        .ok_or(SigningError::MissingInputBox(*box_id))
}

/// Produce a proof for every input of `unsigned`, yielding the finalized
/// [`Transaction`].
///
/// `input_boxes` must contain every box the transaction spends (extra boxes
/// are ignored); the box's script hash is what each proof is checked
/// against. An input whose script hash is not the hash of the secret key's
/// public key fails with [`SigningError::SigningFailed`] carrying that
/// input's index — nothing is returned for the inputs that *could* have
/// been proved.
pub fn sign_transaction(
    unsigned: UnsignedTransaction,
    context: &ErgoStateContext,
    input_boxes: &[UnspentBox],
    secret_key: &SecretKey,
) -> Result<Transaction, SigningError> {
    let tx_id = unsigned.compute_id();
    let public_key = secret_key.public_key();
    let key_script = ScriptHash::of_public_key(&public_key);

    let mut inputs = Vec::with_capacity(unsigned.inputs.len());
    for (input_index, input) in unsigned.inputs.iter().enumerate() {
        let input_box = find_box(input_boxes, &input.box_id)?;

        // The key must actually own this box's guarding script.
        if input_box.script_hash != key_script {
            return Err(SigningError::SigningFailed {
                input_index,
                reason: "secret key does not match the box's guarding script".to_string(),
            });
        }

        let message = spending_message(&tx_id, context, &input.box_id);
        let proof = secret_key.sign(&message);
        inputs.push(Input {
            box_id: input.box_id,
            spending_proof: SpendingProof {
                proof,
                public_key: public_key.clone(),
            },
        });
    }

    debug!(
        tx_id = %tx_id,
        inputs = inputs.len(),
        "all inputs proved"
    );

    Ok(Transaction {
        id: tx_id,
        inputs,
        data_inputs: unsigned.data_inputs,
        outputs: unsigned.outputs,
    })
}

/// Re-check a signed transaction: id integrity, script ownership, and every
/// input's proof.
///
/// Checks run cheapest first and stop at the first failure.
pub fn verify_transaction(
    tx: &Transaction,
    context: &ErgoStateContext,
    input_boxes: &[UnspentBox],
) -> Result<(), SigningError> {
    if tx.to_unsigned().compute_id() != tx.id {
        return Err(SigningError::IdMismatch);
    }

    for (input_index, input) in tx.inputs.iter().enumerate() {
        let input_box = find_box(input_boxes, &input.box_id)?;
        let proof = &input.spending_proof;

        if ScriptHash::of_public_key(&proof.public_key) != input_box.script_hash {
            return Err(SigningError::InvalidProof { input_index });
        }

        let message = spending_message(&tx.id, context, &input.box_id);
        if !proof.public_key.verify(&message, &proof.proof) {
            return Err(SigningError::InvalidProof { input_index });
        }
    }

    Ok(())
}
