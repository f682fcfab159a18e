//! The one-call spending pipeline and the top-level error taxonomy.
//!
//! [`create_signed_transaction`] is the entrypoint a binding layer wraps:
//! caller-owned unspent boxes, requested outputs, a state context, and a
//! secret key go in; a signed, balanced, serializable [`Transaction`] comes
//! out. Selection, assembly, and signing run in that order, and the first
//! error wins — there is no partial result to observe.

use thiserror::Error;
use tracing::info;

use crate::address::{Address, AddressError};
use crate::chain::amount::{sum_box_values, ArithmeticError, BoxValue};
use crate::chain::collections::{CollectionError, DataInputBoxes, OutputBoxes, UnspentBoxes};
use crate::chain::context::{ContextError, ErgoStateContext};
use crate::chain::ergo_box::BoxError;
use crate::chain::token::{accumulate_token, Token, TokenIdError};
use crate::crypto::keys::{KeyError, SecretKey};
use crate::selection::{BoxSelector, SelectionError, SimpleBoxSelector};
use crate::transaction::builder::{BuildError, TxBuilder};
use crate::transaction::signing::{sign_transaction, SigningError};
use crate::transaction::types::{DataInput, Transaction, TransactionError};

/// Coarse classification of a [`WalletError`], for boundary layers that
/// discriminate on error class rather than exact variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed address, key, JSON, or context.
    Parse,
    /// Overflow, underflow, or the token slot bound.
    Arithmetic,
    /// Insufficient funds or tokens during selection.
    Selection,
    /// A violated assembly rule.
    Build,
    /// A per-input proof failure.
    Signing,
}

/// Union of every error the wallet core can surface.
///
/// Each component keeps its own error type; this enum is the discriminated
/// result the boundary sees, with [`WalletError::kind`] collapsing it to
/// the five error classes.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error(transparent)]
    Box(#[from] BoxError),

    #[error(transparent)]
    TokenId(#[from] TokenIdError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Signing(#[from] SigningError),
}

impl WalletError {
    /// The error class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Address(_)
            | Self::Key(_)
            | Self::Context(_)
            | Self::Collection(_)
            | Self::TokenId(_)
            | Self::Transaction(_) => ErrorKind::Parse,
            Self::Box(BoxError::Arithmetic(_)) => ErrorKind::Arithmetic,
            Self::Box(_) => ErrorKind::Parse,
            Self::Arithmetic(_) => ErrorKind::Arithmetic,
            Self::Selection(_) => ErrorKind::Selection,
            Self::Build(_) => ErrorKind::Build,
            Self::Signing(_) => ErrorKind::Signing,
        }
    }
}

/// Select, assemble, and sign a transaction in one call.
///
/// The pipeline:
///
/// 1. The value target is `sum(outputs) + fee`; the token targets are the
///    outputs' merged token demands.
/// 2. [`SimpleBoxSelector`] picks funding boxes from `unspent_boxes`, in
///    the caller's order.
/// 3. [`TxBuilder`] balances the transaction: change to `change_address`
///    (subject to `min_change_value`), residual tokens into the change box,
///    fee as the final output entry.
/// 4. [`sign_transaction`] proves every input with `secret_key`.
///
/// Any failure anywhere aborts the whole call; no partially constructed
/// transaction is ever returned.
#[allow(clippy::too_many_arguments)]
pub fn create_signed_transaction(
    context: &ErgoStateContext,
    unspent_boxes: &UnspentBoxes,
    data_input_boxes: Option<&DataInputBoxes>,
    output_boxes: &OutputBoxes,
    change_address: &Address,
    min_change_value: BoxValue,
    fee_amount: BoxValue,
    secret_key: &SecretKey,
) -> Result<Transaction, WalletError> {
    let outputs = output_boxes.as_slice().to_vec();

    let output_value = sum_box_values(outputs.iter().map(|c| &c.value))?;
    let target_value = output_value.checked_add(fee_amount)?;

    let mut target_tokens: Vec<Token> = Vec::new();
    for output in &outputs {
        for token in &output.assets {
            accumulate_token(&mut target_tokens, token)?;
        }
    }

    let selection = SimpleBoxSelector::new().select(unspent_boxes, target_value, &target_tokens)?;
    let selected_boxes = selection.boxes().to_vec();

    let data_inputs = data_input_boxes
        .map(|boxes| {
            boxes
                .as_slice()
                .iter()
                .map(|b| DataInput { box_id: b.box_id })
                .collect()
        })
        .unwrap_or_default();

    let unsigned = TxBuilder::new(
        selection,
        outputs,
        change_address.clone(),
        min_change_value,
        fee_amount,
    )
    .data_inputs(data_inputs)
    .build(context)?;

    let tx = sign_transaction(unsigned, context, &selected_boxes, secret_key)?;

    info!(
        tx_id = %tx.id,
        inputs = tx.inputs.len(),
        outputs = tx.outputs.len(),
        "signed transaction created"
    );

    Ok(tx)
}
