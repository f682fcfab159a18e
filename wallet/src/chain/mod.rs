//! # Chain Data Model
//!
//! The vocabulary the rest of the wallet core speaks:
//!
//! ```text
//! amount.rs      — BoxValue checked arithmetic (overflow is an error, never a wrap)
//! token.rs       — TokenId / Token and checked multi-asset aggregation
//! ergo_box.rs    — ErgoBoxCandidate, UnspentBox, registers, digest identities
//! collections.rs — non-empty, duplicate-free ordered box collections
//! context.rs     — ErgoStateContext snapshot of chain parameters
//! ```
//!
//! Every type here is immutable after construction and validated eagerly at
//! its boundary, so downstream components (selector, builder, signer) can
//! assume structural soundness and concern themselves only with semantics.

pub mod amount;
pub mod collections;
pub mod context;
pub mod ergo_box;
pub mod token;

pub use amount::{sum_box_values, ArithmeticError, BoxValue};
pub use collections::{CollectionError, DataInputBoxes, OutputBoxes, UnspentBoxes};
pub use context::{BlockHeader, BlockId, ContextError, ErgoStateContext};
pub use ergo_box::{
    BoxError, BoxId, ErgoBoxCandidate, NonMandatoryRegisterId, RegisterValue, Registers, TxId,
    UnspentBox,
};
pub use token::{sum_tokens, token_amount, Token, TokenId, TokenIdError};
