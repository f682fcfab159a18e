//! # Transaction Module
//!
//! Assembly, signing, and the canonical exchange format for transactions.
//!
//! ```text
//! types.rs   — TxId-bearing structures, canonical signable bytes, JSON round trip
//! builder.rs — TxBuilder: balance equation, change box, fee entry, height policy
//! signing.rs — per-input proofs (all-or-nothing) and verification
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Select** — a [`crate::selection::BoxSelector`] picks the funding boxes.
//! 2. **Build** — [`TxBuilder`] assembles a balanced [`UnsignedTransaction`].
//! 3. **Sign** — [`sign_transaction`] proves every input or fails whole.
//! 4. **Serialize** — [`Transaction::to_json`] emits the exchange format.

pub mod builder;
pub mod signing;
pub mod types;

pub use builder::{BuildError, TxBuilder};
pub use signing::{sign_transaction, verify_transaction, SigningError};
pub use types::{
    DataInput, Input, SpendingProof, Transaction, TransactionError, UnsignedInput,
    UnsignedTransaction,
};
