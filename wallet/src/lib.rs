//! # ergo-wallet — UTXO Wallet Core
//!
//! Box selection, transaction assembly, and signing for a UTXO-style ledger
//! with extended box semantics: boxes carry a native value, an ordered
//! multi-asset token list, a guarding script, optional registers, and a
//! creation height.
//!
//! This crate is the pure core a host binding wraps. It does no I/O of any
//! kind — unspent boxes, chain context, and keys are supplied wholesale by
//! the caller, every operation is a synchronous computation over immutable
//! values, and every fallible operation returns a typed error.
//!
//! ## Architecture
//!
//! - **chain** — the data model: checked amounts, tokens, boxes,
//!   collections, state context.
//! - **address** — network-tagged Bech32 addresses owning script hashes.
//! - **crypto** — BLAKE3/SHA-256 digests and Ed25519 key material.
//! - **selection** — deterministic greedy box selection behind a trait.
//! - **transaction** — assembly, per-input proofs, canonical JSON.
//! - **wallet** — the one-call pipeline and the error taxonomy.
//!
//! ## The invariant that matters
//!
//! Every transaction this crate produces conserves value exactly:
//! `sum(input values) == sum(output values)`, with the fee an explicit
//! output entry and change returned to the sender. Tokens conserve
//! per-id the same way unless a burn is explicitly requested. Arithmetic
//! that cannot uphold this fails; it never wraps, truncates, or clamps.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ergo_wallet::address::{Address, NetworkPrefix};
//! use ergo_wallet::chain::amount::BoxValue;
//! use ergo_wallet::chain::collections::{OutputBoxes, UnspentBoxes};
//! use ergo_wallet::chain::context::ErgoStateContext;
//! use ergo_wallet::chain::ergo_box::ErgoBoxCandidate;
//! use ergo_wallet::crypto::keys::SecretKey;
//! use ergo_wallet::wallet::create_signed_transaction;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let context = ErgoStateContext::from_json(r#"{"currentHeight": 102, "lastHeaders": [
//!     {"version": 1, "id": "11…", "parentId": "00…", "height": 102, "timestamp": 0}
//! ]}"#)?;
//! let unspent = UnspentBoxes::from_json("…")?;
//! let secret_key = SecretKey::from_hex("…")?;
//! let recipient = Address::parse("ergo1…", NetworkPrefix::Mainnet)?;
//! let change = Address::p2pk(&secret_key.public_key(), NetworkPrefix::Mainnet);
//!
//! let outputs = OutputBoxes::single(ErgoBoxCandidate::pay_to_address(
//!     &recipient,
//!     BoxValue::new(50_000_000),
//!     context.current_height(),
//! ));
//!
//! let tx = create_signed_transaction(
//!     &context,
//!     &unspent,
//!     None,
//!     &outputs,
//!     &change,
//!     BoxValue::new(1_000_000),
//!     BoxValue::new(1_000_000),
//!     &secret_key,
//! )?;
//! println!("{}", tx.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod chain;
pub mod config;
pub mod crypto;
pub mod selection;
pub mod transaction;
pub mod wallet;

pub use address::{Address, AddressError, NetworkPrefix, ScriptHash};
pub use chain::{
    ArithmeticError, BoxValue, DataInputBoxes, ErgoBoxCandidate, ErgoStateContext, OutputBoxes,
    Token, TokenId, UnspentBox, UnspentBoxes,
};
pub use crypto::keys::SecretKey;
pub use selection::{BoxSelection, BoxSelector, SelectionError, SimpleBoxSelector};
pub use transaction::{
    sign_transaction, verify_transaction, BuildError, SigningError, Transaction, TxBuilder,
    UnsignedTransaction,
};
pub use wallet::{create_signed_transaction, ErrorKind, WalletError};
