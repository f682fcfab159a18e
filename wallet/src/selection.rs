//! Box selection.
//!
//! Given the caller's unspent boxes, a value target, and a set of required
//! token amounts, pick the ordered subset that will fund a transaction.
//!
//! The policy is deliberately boring: deterministic greedy first-fit in the
//! caller-supplied order. Walk the sequence once, accumulate boxes, stop the
//! moment every threshold is met. No randomization, no re-ordering, no
//! heuristics — for a given input ordering and target, the result is always
//! the same subset, and never a superset of what was needed at the moment
//! the targets were first satisfied. Callers that want a smarter policy
//! express it by ordering their boxes before calling in, or by providing
//! another [`BoxSelector`] implementation.

use thiserror::Error;
use tracing::debug;

use crate::chain::amount::{ArithmeticError, BoxValue};
use crate::chain::collections::UnspentBoxes;
use crate::chain::ergo_box::UnspentBox;
use crate::chain::token::{accumulate_token, token_amount, Token, TokenId};

/// Errors from box selection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The full sequence was scanned without covering the value target.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    /// The full sequence was scanned without covering a required token.
    #[error("insufficient token {token_id}: need {needed}, have {available}")]
    InsufficientToken {
        token_id: TokenId,
        needed: u64,
        available: u64,
    },

    /// Accumulation itself overflowed.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

// ---------------------------------------------------------------------------
// BoxSelection
// ---------------------------------------------------------------------------

/// The outcome of a successful selection: the chosen boxes in their original
/// order, plus the aggregate value and token totals they carry.
///
/// Totals are computed once here with checked arithmetic so the transaction
/// builder can consume them without re-summing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoxSelection {
    boxes: Vec<UnspentBox>,
    total_value: BoxValue,
    total_tokens: Vec<Token>,
}

impl BoxSelection {
    /// The selected boxes, in input order.
    pub fn boxes(&self) -> &[UnspentBox] {
        &self.boxes
    }

    /// Sum of the selected boxes' values.
    pub fn total_value(&self) -> BoxValue {
        self.total_value
    }

    /// Merged token totals over the selected boxes, first-seen id order.
    pub fn total_tokens(&self) -> &[Token] {
        &self.total_tokens
    }

    /// Consume the selection, yielding the boxes.
    pub fn into_boxes(self) -> Vec<UnspentBox> {
        self.boxes
    }
}

// ---------------------------------------------------------------------------
// BoxSelector
// ---------------------------------------------------------------------------

/// Strategy seam for choosing which unspent boxes fund a transaction.
///
/// Implementations must only ever return boxes present in the input
/// collection (no fabrication) and must never return the same box identity
/// twice — the input collection's own uniqueness makes the latter structural
/// for any subset-returning implementation.
pub trait BoxSelector {
    /// Choose a subset of `boxes` whose value covers `target_value` and
    /// whose token totals cover every entry of `target_tokens`.
    fn select(
        &self,
        boxes: &UnspentBoxes,
        target_value: BoxValue,
        target_tokens: &[Token],
    ) -> Result<BoxSelection, SelectionError>;
}

/// Deterministic greedy first-fit selector, the default policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleBoxSelector;

impl SimpleBoxSelector {
    /// Create a selector.
    pub fn new() -> Self {
        Self
    }
}

impl BoxSelector for SimpleBoxSelector {
    fn select(
        &self,
        boxes: &UnspentBoxes,
        target_value: BoxValue,
        target_tokens: &[Token],
    ) -> Result<BoxSelection, SelectionError> {
        // Duplicate target ids are folded up front so each id has a single
        // threshold to meet.
        let mut required: Vec<Token> = Vec::new();
        for t in target_tokens {
            accumulate_token(&mut required, t)?;
        }

        let mut selected: Vec<UnspentBox> = Vec::new();
        let mut total_value = BoxValue::ZERO;
        let mut total_tokens: Vec<Token> = Vec::new();

        let satisfied = |value: BoxValue, tokens: &[Token]| {
            value >= target_value
                && required
                    .iter()
                    .all(|req| token_amount(tokens, &req.token_id) >= req.amount)
        };

        for unspent in boxes.as_slice() {
            if satisfied(total_value, &total_tokens) {
                break;
            }
            total_value = total_value.checked_add(unspent.value)?;
            for token in &unspent.assets {
                accumulate_token(&mut total_tokens, token)?;
            }
            selected.push(unspent.clone());
        }

        if total_value < target_value {
            return Err(SelectionError::InsufficientFunds {
                needed: target_value.raw(),
                available: total_value.raw(),
            });
        }
        for req in &required {
            let available = token_amount(&total_tokens, &req.token_id);
            if available < req.amount {
                return Err(SelectionError::InsufficientToken {
                    token_id: req.token_id,
                    needed: req.amount.raw(),
                    available: available.raw(),
                });
            }
        }

        debug!(
            selected = selected.len(),
            candidates = boxes.len(),
            total_value = total_value.raw(),
            "box selection complete"
        );

        Ok(BoxSelection {
            boxes: selected,
            total_value,
            total_tokens,
        })
    }
}
