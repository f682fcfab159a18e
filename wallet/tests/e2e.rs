//! End-to-end integration tests for the wallet core.
//!
//! These tests exercise the full spending lifecycle from parsed inputs
//! through a serialized signed transaction. They prove that the core
//! components compose correctly: JSON parsing of unspent boxes and chain
//! context, box selection, balanced assembly with change and fee, per-input
//! proof production, verification, and the exact JSON round trip.
//!
//! Each test stands alone with freshly generated keys and its own boxes.
//! No shared state, no test ordering dependencies, no flaky failures.

use std::collections::BTreeMap;

use ergo_wallet::address::{Address, NetworkPrefix, ScriptHash};
use ergo_wallet::chain::amount::BoxValue;
use ergo_wallet::chain::collections::{DataInputBoxes, OutputBoxes, UnspentBoxes};
use ergo_wallet::chain::context::{BlockHeader, BlockId, ContextError, ErgoStateContext};
use ergo_wallet::chain::ergo_box::{BoxId, ErgoBoxCandidate, TxId, UnspentBox};
use ergo_wallet::chain::token::{Token, TokenId};
use ergo_wallet::config::MINER_FEE_SCRIPT_HASH;
use ergo_wallet::crypto::keys::SecretKey;
use ergo_wallet::selection::SelectionError;
use ergo_wallet::transaction::builder::BuildError;
use ergo_wallet::transaction::signing::{verify_transaction, SigningError};
use ergo_wallet::transaction::types::Transaction;
use ergo_wallet::wallet::{create_signed_transaction, ErrorKind, WalletError};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const FEE: u64 = 1_000_000;
const MIN_CHANGE: u64 = 1_000_000;

/// A chain context whose head sits at the given height.
fn context_at(height: u32) -> ErgoStateContext {
    ErgoStateContext::new(
        height,
        vec![BlockHeader {
            version: 1,
            id: BlockId::new([height as u8; 32]),
            parent_id: BlockId::new([0u8; 32]),
            height,
            timestamp: 1_693_000_000_000,
        }],
    )
    .expect("single-header context is valid")
}

/// An unspent box guarded by the given key's script, created at height 100.
fn owned_box(id_byte: u8, value: u64, tokens: Vec<Token>, owner: &SecretKey) -> UnspentBox {
    UnspentBox {
        box_id: BoxId::new([id_byte; 32]),
        value: BoxValue::new(value),
        script_hash: ScriptHash::of_public_key(&owner.public_key()),
        creation_height: 100,
        assets: tokens,
        additional_registers: BTreeMap::new(),
        transaction_id: TxId::new([9u8; 32]),
        index: 0,
        inclusion_height: 101,
    }
}

fn token(id_byte: u8, amount: u64) -> Token {
    Token::new(TokenId::new([id_byte; 32]), BoxValue::new(amount))
}

/// A payment output candidate to a fresh recipient at the given height.
fn payment_to(recipient: &Address, value: u64, height: u32) -> ErgoBoxCandidate {
    ErgoBoxCandidate::pay_to_address(recipient, BoxValue::new(value), height)
}

fn fresh_address() -> Address {
    Address::p2pk(&SecretKey::generate().public_key(), NetworkPrefix::Mainnet)
}

/// Sums output values paying the given script.
fn value_paid_to(tx: &Transaction, script: &ScriptHash) -> u64 {
    tx.outputs
        .iter()
        .filter(|o| &o.script_hash == script)
        .map(|o| o.value.raw())
        .sum()
}

// ---------------------------------------------------------------------------
// 1. Full Spend Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn full_spend_lifecycle() {
    let sender = SecretKey::generate();
    let sender_script = ScriptHash::of_public_key(&sender.public_key());
    let change_address = Address::p2pk(&sender.public_key(), NetworkPrefix::Mainnet);
    let recipient = fresh_address();
    let context = context_at(102);

    let funding = vec![owned_box(1, 100_000_000, vec![], &sender)];
    let unspent = UnspentBoxes::new(funding.clone()).unwrap();
    let outputs = OutputBoxes::single(payment_to(&recipient, 50_000_000, 102));

    let tx = create_signed_transaction(
        &context,
        &unspent,
        None,
        &outputs,
        &change_address,
        BoxValue::new(MIN_CHANGE),
        BoxValue::new(FEE),
        &sender,
    )
    .unwrap();

    // One input, three outputs: payment, change, fee.
    assert_eq!(tx.inputs.len(), 1);
    assert_eq!(tx.inputs[0].box_id, BoxId::new([1; 32]));
    assert_eq!(tx.outputs.len(), 3);
    assert_eq!(value_paid_to(&tx, &recipient.script_hash()), 50_000_000);
    assert_eq!(value_paid_to(&tx, &sender_script), 49_000_000);
    assert_eq!(
        value_paid_to(&tx, &ScriptHash::new(MINER_FEE_SCRIPT_HASH)),
        FEE
    );

    // Conservation to the unit.
    let out_sum: u64 = tx.outputs.iter().map(|o| o.value.raw()).sum();
    assert_eq!(out_sum, 100_000_000);

    // Proofs hold, and the exchange format round-trips exactly.
    verify_transaction(&tx, &context, &funding).unwrap();
    let json = tx.to_json().unwrap();
    let parsed = Transaction::from_json(&json).unwrap();
    assert_eq!(parsed, tx);
    assert_eq!(parsed.to_json().unwrap(), json);
}

#[test]
fn multiple_boxes_fund_one_payment() {
    let sender = SecretKey::generate();
    let change_address = Address::p2pk(&sender.public_key(), NetworkPrefix::Mainnet);
    let context = context_at(102);

    let funding = vec![
        owned_box(1, 40_000_000, vec![], &sender),
        owned_box(2, 40_000_000, vec![], &sender),
        owned_box(3, 40_000_000, vec![], &sender),
    ];
    let unspent = UnspentBoxes::new(funding.clone()).unwrap();
    let outputs = OutputBoxes::single(payment_to(&fresh_address(), 100_000_000, 102));

    let tx = create_signed_transaction(
        &context,
        &unspent,
        None,
        &outputs,
        &change_address,
        BoxValue::new(MIN_CHANGE),
        BoxValue::new(FEE),
        &sender,
    )
    .unwrap();

    // All three boxes are needed: 100M + 1M fee exceeds any two.
    assert_eq!(tx.inputs.len(), 3);
    let ids: Vec<BoxId> = tx.inputs.iter().map(|i| i.box_id).collect();
    assert_eq!(
        ids,
        vec![BoxId::new([1; 32]), BoxId::new([2; 32]), BoxId::new([3; 32])]
    );
    let out_sum: u64 = tx.outputs.iter().map(|o| o.value.raw()).sum();
    assert_eq!(out_sum, 120_000_000);
    verify_transaction(&tx, &context, &funding).unwrap();
}

#[test]
fn boxes_parsed_from_json_are_spendable() {
    let sender = SecretKey::generate();
    let change_address = Address::p2pk(&sender.public_key(), NetworkPrefix::Mainnet);
    let context = context_at(102);

    // Round the pool through the JSON exchange format before spending it.
    let pool = UnspentBoxes::new(vec![owned_box(1, 100_000_000, vec![], &sender)]).unwrap();
    let json = serde_json::to_string(&pool).unwrap();
    let unspent = UnspentBoxes::from_json(&json).unwrap();
    assert_eq!(unspent, pool);

    let outputs = OutputBoxes::single(payment_to(&fresh_address(), 50_000_000, 102));
    let tx = create_signed_transaction(
        &context,
        &unspent,
        None,
        &outputs,
        &change_address,
        BoxValue::new(MIN_CHANGE),
        BoxValue::new(FEE),
        &sender,
    )
    .unwrap();
    assert_eq!(tx.outputs.len(), 3);
}

// ---------------------------------------------------------------------------
// 2. Failure Modes Surface Typed Errors
// ---------------------------------------------------------------------------

#[test]
fn insufficient_funds_is_a_selection_error() {
    let sender = SecretKey::generate();
    let change_address = Address::p2pk(&sender.public_key(), NetworkPrefix::Mainnet);
    let context = context_at(102);

    let unspent = UnspentBoxes::new(vec![owned_box(1, 100_000_000, vec![], &sender)]).unwrap();
    let outputs = OutputBoxes::single(payment_to(&fresh_address(), 200_000_000, 102));

    let err = create_signed_transaction(
        &context,
        &unspent,
        None,
        &outputs,
        &change_address,
        BoxValue::new(MIN_CHANGE),
        BoxValue::new(FEE),
        &sender,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Selection);
    assert!(matches!(
        err,
        WalletError::Selection(SelectionError::InsufficientFunds {
            needed: 201_000_000,
            available: 100_000_000,
        })
    ));
}

#[test]
fn dust_change_is_a_build_error() {
    let sender = SecretKey::generate();
    let change_address = Address::p2pk(&sender.public_key(), NetworkPrefix::Mainnet);
    let context = context_at(102);

    // 50M + 1M fee out of 51.000.001 leaves one unit of change.
    let unspent = UnspentBoxes::new(vec![owned_box(1, 51_000_001, vec![], &sender)]).unwrap();
    let outputs = OutputBoxes::single(payment_to(&fresh_address(), 50_000_000, 102));

    let err = create_signed_transaction(
        &context,
        &unspent,
        None,
        &outputs,
        &change_address,
        BoxValue::new(MIN_CHANGE),
        BoxValue::new(FEE),
        &sender,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Build);
    assert!(matches!(
        err,
        WalletError::Build(BuildError::ChangeBelowMinimum {
            change: 1,
            min_change_value: MIN_CHANGE,
        })
    ));
}

#[test]
fn dangling_tokens_are_a_build_error() {
    let sender = SecretKey::generate();
    let change_address = Address::p2pk(&sender.public_key(), NetworkPrefix::Mainnet);
    let context = context_at(102);

    // Exact spend (no change box), but the input carries tokens nobody
    // receives. The strict policy refuses to lose them silently.
    let unspent =
        UnspentBoxes::new(vec![owned_box(1, 51_000_000, vec![token(7, 40)], &sender)]).unwrap();
    let outputs = OutputBoxes::single(payment_to(&fresh_address(), 50_000_000, 102));

    let err = create_signed_transaction(
        &context,
        &unspent,
        None,
        &outputs,
        &change_address,
        BoxValue::new(MIN_CHANGE),
        BoxValue::new(FEE),
        &sender,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Build);
    assert!(matches!(
        err,
        WalletError::Build(BuildError::DanglingTokens { count: 1, .. })
    ));
}

#[test]
fn wrong_key_is_a_signing_error() {
    let owner = SecretKey::generate();
    let intruder = SecretKey::generate();
    let change_address = Address::p2pk(&intruder.public_key(), NetworkPrefix::Mainnet);
    let context = context_at(102);

    let unspent = UnspentBoxes::new(vec![owned_box(1, 100_000_000, vec![], &owner)]).unwrap();
    let outputs = OutputBoxes::single(payment_to(&fresh_address(), 50_000_000, 102));

    let err = create_signed_transaction(
        &context,
        &unspent,
        None,
        &outputs,
        &change_address,
        BoxValue::new(MIN_CHANGE),
        BoxValue::new(FEE),
        &intruder,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Signing);
    assert!(matches!(
        err,
        WalletError::Signing(SigningError::SigningFailed { input_index: 0, .. })
    ));
}

// ---------------------------------------------------------------------------
// 3. Token Transfers
// ---------------------------------------------------------------------------

#[test]
fn token_transfer_conserves_every_id() {
    let sender = SecretKey::generate();
    let sender_script = ScriptHash::of_public_key(&sender.public_key());
    let change_address = Address::p2pk(&sender.public_key(), NetworkPrefix::Mainnet);
    let recipient = fresh_address();
    let context = context_at(102);

    let funding = vec![owned_box(
        1,
        100_000_000,
        vec![token(7, 100), token(8, 5)],
        &sender,
    )];
    let unspent = UnspentBoxes::new(funding.clone()).unwrap();

    // Send 30 of token 7; token 8 and the remaining 70 go back as change.
    let mut out = payment_to(&recipient, 10_000_000, 102);
    out.assets = vec![token(7, 30)];
    let outputs = OutputBoxes::single(out);

    let tx = create_signed_transaction(
        &context,
        &unspent,
        None,
        &outputs,
        &change_address,
        BoxValue::new(MIN_CHANGE),
        BoxValue::new(FEE),
        &sender,
    )
    .unwrap();

    let change = tx
        .outputs
        .iter()
        .find(|o| o.script_hash == sender_script)
        .expect("change box present");
    assert_eq!(change.assets, vec![token(7, 70), token(8, 5)]);

    // Per-id conservation across the whole transaction.
    for (id_byte, total) in [(7u8, 100u64), (8, 5)] {
        let out_total: u64 = tx
            .outputs
            .iter()
            .flat_map(|o| &o.assets)
            .filter(|t| t.token_id == TokenId::new([id_byte; 32]))
            .map(|t| t.amount.raw())
            .sum();
        assert_eq!(out_total, total);
    }
    verify_transaction(&tx, &context, &funding).unwrap();
}

#[test]
fn missing_token_is_a_selection_error() {
    let sender = SecretKey::generate();
    let change_address = Address::p2pk(&sender.public_key(), NetworkPrefix::Mainnet);
    let context = context_at(102);

    let unspent = UnspentBoxes::new(vec![owned_box(1, 100_000_000, vec![], &sender)]).unwrap();
    let mut out = payment_to(&fresh_address(), 10_000_000, 102);
    out.assets = vec![token(7, 30)];
    let outputs = OutputBoxes::single(out);

    let err = create_signed_transaction(
        &context,
        &unspent,
        None,
        &outputs,
        &change_address,
        BoxValue::new(MIN_CHANGE),
        BoxValue::new(FEE),
        &sender,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Selection);
    assert!(matches!(
        err,
        WalletError::Selection(SelectionError::InsufficientToken { needed: 30, .. })
    ));
}

// ---------------------------------------------------------------------------
// 4. Data Inputs
// ---------------------------------------------------------------------------

#[test]
fn data_inputs_are_referenced_not_spent() {
    let sender = SecretKey::generate();
    let oracle = SecretKey::generate();
    let change_address = Address::p2pk(&sender.public_key(), NetworkPrefix::Mainnet);
    let context = context_at(102);

    let funding = vec![owned_box(1, 100_000_000, vec![], &sender)];
    let unspent = UnspentBoxes::new(funding.clone()).unwrap();
    let oracle_box = owned_box(42, 1_000_000, vec![], &oracle);
    let data_inputs = DataInputBoxes::new(vec![oracle_box]).unwrap();
    let outputs = OutputBoxes::single(payment_to(&fresh_address(), 50_000_000, 102));

    let tx = create_signed_transaction(
        &context,
        &unspent,
        Some(&data_inputs),
        &outputs,
        &change_address,
        BoxValue::new(MIN_CHANGE),
        BoxValue::new(FEE),
        &sender,
    )
    .unwrap();

    // The oracle box is referenced but never signed for.
    assert_eq!(tx.data_inputs.len(), 1);
    assert_eq!(tx.data_inputs[0].box_id, BoxId::new([42; 32]));
    assert_eq!(tx.inputs.len(), 1);
    assert!(tx.inputs.iter().all(|i| i.box_id != BoxId::new([42; 32])));

    // Only the spent box is needed to verify; the data input plays no part.
    verify_transaction(&tx, &context, &funding).unwrap();

    let json = tx.to_json().unwrap();
    assert!(json.contains("\"dataInputs\""));
    assert_eq!(Transaction::from_json(&json).unwrap(), tx);
}

#[test]
fn empty_data_inputs_are_omitted_from_json() {
    let sender = SecretKey::generate();
    let change_address = Address::p2pk(&sender.public_key(), NetworkPrefix::Mainnet);
    let context = context_at(102);

    let unspent = UnspentBoxes::new(vec![owned_box(1, 100_000_000, vec![], &sender)]).unwrap();
    let outputs = OutputBoxes::single(payment_to(&fresh_address(), 50_000_000, 102));

    let tx = create_signed_transaction(
        &context,
        &unspent,
        None,
        &outputs,
        &change_address,
        BoxValue::new(MIN_CHANGE),
        BoxValue::new(FEE),
        &sender,
    )
    .unwrap();

    let json = tx.to_json().unwrap();
    assert!(!json.contains("dataInputs"));
    assert_eq!(Transaction::from_json(&json).unwrap(), tx);
}

// ---------------------------------------------------------------------------
// 5. Chain Context
// ---------------------------------------------------------------------------

#[test]
fn context_parses_from_json() {
    let json = format!(
        r#"{{
            "currentHeight": 102,
            "lastHeaders": [
                {{"version": 1, "id": "{id}", "parentId": "{parent}", "height": 102, "timestamp": 1693000000000}}
            ]
        }}"#,
        id = "66".repeat(32),
        parent = "00".repeat(32),
    );
    let context = ErgoStateContext::from_json(&json).unwrap();
    assert_eq!(context.current_height(), 102);
    assert_eq!(context.last_headers().len(), 1);
}

#[test]
fn context_rejects_empty_headers_and_height_mismatch() {
    // Parsed form: validation failures surface as malformed-context errors.
    let err = ErgoStateContext::from_json(r#"{"currentHeight": 5, "lastHeaders": []}"#)
        .unwrap_err();
    assert!(matches!(err, ContextError::MalformedContext(_)));

    let json = format!(
        r#"{{
            "currentHeight": 103,
            "lastHeaders": [
                {{"version": 1, "id": "{id}", "parentId": "{parent}", "height": 102, "timestamp": 0}}
            ]
        }}"#,
        id = "66".repeat(32),
        parent = "00".repeat(32),
    );
    assert!(matches!(
        ErgoStateContext::from_json(&json).unwrap_err(),
        ContextError::MalformedContext(_)
    ));

    // Direct construction keeps the typed variants.
    assert_eq!(
        ErgoStateContext::new(5, vec![]).unwrap_err(),
        ContextError::EmptyHeaders
    );
}

#[test]
fn proofs_are_bound_to_the_context() {
    let sender = SecretKey::generate();
    let change_address = Address::p2pk(&sender.public_key(), NetworkPrefix::Mainnet);
    let context = context_at(102);

    let funding = vec![owned_box(1, 100_000_000, vec![], &sender)];
    let unspent = UnspentBoxes::new(funding.clone()).unwrap();
    let outputs = OutputBoxes::single(payment_to(&fresh_address(), 50_000_000, 102));

    let tx = create_signed_transaction(
        &context,
        &unspent,
        None,
        &outputs,
        &change_address,
        BoxValue::new(MIN_CHANGE),
        BoxValue::new(FEE),
        &sender,
    )
    .unwrap();

    // The id survives a context change (it covers only the transaction),
    // but the proofs do not.
    let other = context_at(103);
    let err = verify_transaction(&tx, &other, &funding).unwrap_err();
    assert_eq!(err, SigningError::InvalidProof { input_index: 0 });
}

// ---------------------------------------------------------------------------
// 6. Exchange Format Integrity
// ---------------------------------------------------------------------------

#[test]
fn tampered_serialized_transaction_is_rejected() {
    let sender = SecretKey::generate();
    let change_address = Address::p2pk(&sender.public_key(), NetworkPrefix::Mainnet);
    let context = context_at(102);

    let unspent = UnspentBoxes::new(vec![owned_box(1, 100_000_000, vec![], &sender)]).unwrap();
    let outputs = OutputBoxes::single(payment_to(&fresh_address(), 50_000_000, 102));

    let tx = create_signed_transaction(
        &context,
        &unspent,
        None,
        &outputs,
        &change_address,
        BoxValue::new(MIN_CHANGE),
        BoxValue::new(FEE),
        &sender,
    )
    .unwrap();

    let json = tx.to_json().unwrap();
    let tampered = json.replace("\"value\":50000000", "\"value\":90000000");
    assert_ne!(json, tampered);
    assert!(Transaction::from_json(&tampered).is_err());
}
