//! Transaction assembly.
//!
//! The [`TxBuilder`] turns a box selection plus the requested outputs into
//! a balanced [`UnsignedTransaction`]. "Balanced" is not aspirational: the
//! builder either emits a transaction where input value equals output value
//! to the unit (fee entry and change box included) or it fails, and every
//! failure mode has its own error.
//!
//! The fee is an ordinary output paying the well-known miner-fee script,
//! appended after the change box. Residual tokens — input tokens no output
//! consumes — go entirely into the change box; a residual with no change
//! box to live in is an error, not a silent burn. Burning is only available
//! as an explicit opt-in that names the tokens being destroyed.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::address::{Address, ScriptHash};
use crate::chain::amount::{sum_box_values, ArithmeticError, BoxValue};
use crate::chain::context::ErgoStateContext;
use crate::chain::ergo_box::{BoxError, ErgoBoxCandidate};
use crate::chain::token::{accumulate_token, token_amount, Token, TokenId};
use crate::config::MINER_FEE_SCRIPT_HASH;
use crate::selection::BoxSelection;
use crate::transaction::types::{DataInput, UnsignedInput, UnsignedTransaction};

/// Errors from transaction assembly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// No boxes were selected to fund the transaction.
    #[error("transaction requires at least one input box")]
    NoInputBoxes,

    /// No outputs were requested.
    #[error("transaction requires at least one output box")]
    NoOutputBoxes,

    /// Selected value does not cover requested outputs plus fee.
    #[error("not enough coins to pay the fee: short by {missing}")]
    NotEnoughCoinsToPayFee { missing: u64 },

    /// The change that would be produced is uneconomical dust.
    #[error("change {change} is below the minimum change value {min_change_value}")]
    ChangeBelowMinimum { change: u64, min_change_value: u64 },

    /// Residual tokens exist but there is no change box to carry them.
    #[error("{count} residual token(s) would be unspendably lost (first: {first})")]
    DanglingTokens { count: usize, first: TokenId },

    /// An output candidate claims a creation height below the newest input.
    #[error("invalid creation height {output_height}: inputs require at least {min_required}")]
    InvalidCreationHeight {
        output_height: u32,
        min_required: u32,
    },

    /// Outputs demand more of a token than the selected inputs carry.
    #[error("outputs demand more of token {token_id} than the inputs carry")]
    TokenShortfall { token_id: TokenId },

    /// A requested burn exceeds the residual amount of that token.
    #[error("burn of token {token_id} exceeds its residual amount")]
    InvalidBurn { token_id: TokenId },

    /// Value or token arithmetic failed.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    /// The change box could not be constructed (token slot bound).
    #[error(transparent)]
    Box(#[from] BoxError),
}

/// Assembles an [`UnsignedTransaction`] from a selection and the requested
/// outputs.
///
/// # Usage
///
/// ```rust,no_run
/// # use ergo_wallet::address::{Address, NetworkPrefix};
/// # use ergo_wallet::chain::amount::BoxValue;
/// # use ergo_wallet::chain::context::ErgoStateContext;
/// # use ergo_wallet::selection::BoxSelection;
/// # use ergo_wallet::transaction::builder::TxBuilder;
/// # fn demo(context: &ErgoStateContext, selection: BoxSelection,
/// #         outputs: Vec<ergo_wallet::chain::ergo_box::ErgoBoxCandidate>,
/// #         change_address: Address) {
/// let unsigned = TxBuilder::new(
///     selection,
///     outputs,
///     change_address,
///     BoxValue::new(1_000_000),
///     BoxValue::new(1_000_000),
/// )
/// .build(context)
/// .unwrap();
/// # }
/// ```
pub struct TxBuilder {
    selection: BoxSelection,
    outputs: Vec<ErgoBoxCandidate>,
    change_address: Address,
    min_change_value: BoxValue,
    fee_amount: BoxValue,
    data_inputs: Vec<DataInput>,
    burn_tokens: Vec<Token>,
}

impl TxBuilder {
    /// Start a builder from the selection funding the transaction and the
    /// requested output candidates.
    pub fn new(
        selection: BoxSelection,
        outputs: Vec<ErgoBoxCandidate>,
        change_address: Address,
        min_change_value: BoxValue,
        fee_amount: BoxValue,
    ) -> Self {
        Self {
            selection,
            outputs,
            change_address,
            min_change_value,
            fee_amount,
            data_inputs: Vec::new(),
            burn_tokens: Vec::new(),
        }
    }

    /// Reference boxes read-only without spending them.
    pub fn data_inputs(mut self, data_inputs: Vec<DataInput>) -> Self {
        self.data_inputs = data_inputs;
        self
    }

    /// Explicitly burn the named token amounts.
    ///
    /// Tokens listed here are subtracted from the residual instead of being
    /// placed into the change box. Anything residual and *not* listed still
    /// follows the strict policy: it must fit in a change box or the build
    /// fails with [`BuildError::DanglingTokens`].
    pub fn burn_tokens(mut self, tokens: Vec<Token>) -> Self {
        self.burn_tokens = tokens;
        self
    }

    /// Assemble the unsigned transaction.
    ///
    /// Fails on the first violated rule; never emits a partially balanced
    /// transaction.
    pub fn build(self, context: &ErgoStateContext) -> Result<UnsignedTransaction, BuildError> {
        if self.selection.boxes().is_empty() {
            return Err(BuildError::NoInputBoxes);
        }
        if self.outputs.is_empty() {
            return Err(BuildError::NoOutputBoxes);
        }

        let total_input_value = self.selection.total_value();
        let input_tokens = self.selection.total_tokens();

        // Requested output value plus the fee, all checked.
        let output_value = sum_box_values(self.outputs.iter().map(|c| &c.value))?;
        let total_requested = output_value.checked_add(self.fee_amount)?;

        let change_value = total_input_value.checked_sub(total_requested).map_err(
            |_| BuildError::NotEnoughCoinsToPayFee {
                missing: total_requested.raw() - total_input_value.raw(),
            },
        )?;

        // Token bookkeeping: outputs may not demand more than inputs carry,
        // and whatever is left over is the residual.
        let mut output_tokens: Vec<Token> = Vec::new();
        for output in &self.outputs {
            for token in &output.assets {
                accumulate_token(&mut output_tokens, token)?;
            }
        }
        let mut residual_tokens: Vec<Token> = Vec::new();
        for input_token in input_tokens {
            let consumed = token_amount(&output_tokens, &input_token.token_id);
            let left = input_token
                .amount
                .checked_sub(consumed)
                .map_err(|_| BuildError::TokenShortfall {
                    token_id: input_token.token_id,
                })?;
            if !left.is_zero() {
                residual_tokens.push(Token::new(input_token.token_id, left));
            }
        }
        for output_token in &output_tokens {
            if token_amount(input_tokens, &output_token.token_id) < output_token.amount {
                return Err(BuildError::TokenShortfall {
                    token_id: output_token.token_id,
                });
            }
        }

        // Explicit burns come out of the residual.
        for burn in &self.burn_tokens {
            let entry = residual_tokens
                .iter_mut()
                .find(|t| t.token_id == burn.token_id)
                .ok_or(BuildError::InvalidBurn {
                    token_id: burn.token_id,
                })?;
            entry.amount = entry
                .amount
                .checked_sub(burn.amount)
                .map_err(|_| BuildError::InvalidBurn {
                    token_id: burn.token_id,
                })?;
        }
        residual_tokens.retain(|t| !t.amount.is_zero());

        // Monotonic height policy: nothing this transaction creates may
        // claim a height below its newest input.
        let min_required = self
            .selection
            .boxes()
            .iter()
            .map(|b| b.creation_height)
            .max()
            .unwrap_or(0);
        for output in &self.outputs {
            if output.creation_height < min_required {
                return Err(BuildError::InvalidCreationHeight {
                    output_height: output.creation_height,
                    min_required,
                });
            }
        }
        let new_box_height = context.current_height();
        if new_box_height < min_required {
            return Err(BuildError::InvalidCreationHeight {
                output_height: new_box_height,
                min_required,
            });
        }

        let mut outputs = self.outputs;

        if change_value.is_zero() {
            if let Some(first) = residual_tokens.first() {
                return Err(BuildError::DanglingTokens {
                    count: residual_tokens.len(),
                    first: first.token_id,
                });
            }
        } else {
            if change_value < self.min_change_value {
                return Err(BuildError::ChangeBelowMinimum {
                    change: change_value.raw(),
                    min_change_value: self.min_change_value.raw(),
                });
            }
            let change_box = ErgoBoxCandidate::new(
                change_value,
                self.change_address.script_hash(),
                new_box_height,
                residual_tokens,
                BTreeMap::new(),
            )?;
            outputs.push(change_box);
        }

        if !self.fee_amount.is_zero() {
            outputs.push(ErgoBoxCandidate {
                value: self.fee_amount,
                script_hash: ScriptHash::new(MINER_FEE_SCRIPT_HASH),
                creation_height: new_box_height,
                assets: Vec::new(),
                additional_registers: BTreeMap::new(),
            });
        }

        debug!(
            inputs = self.selection.boxes().len(),
            outputs = outputs.len(),
            change = change_value.raw(),
            fee = self.fee_amount.raw(),
            "assembled unsigned transaction"
        );

        let inputs = self
            .selection
            .boxes()
            .iter()
            .map(|b| UnsignedInput { box_id: b.box_id })
            .collect();

        Ok(UnsignedTransaction {
            inputs,
            data_inputs: self.data_inputs,
            outputs,
        })
    }
}
