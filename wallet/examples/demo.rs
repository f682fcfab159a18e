//! Interactive CLI demo of the full wallet core lifecycle.
//!
//! Walks through key generation, address derivation, chain context parsing,
//! box selection, balanced transaction assembly, signing, verification, and
//! the JSON exchange format — including a tour of the failure modes. The
//! output uses ANSI escape codes for colored, storytelling-style terminal
//! rendering.
//!
//! Run with:
//!   cargo run --example demo --release

use std::collections::BTreeMap;
use std::time::Instant;

use ergo_wallet::address::{Address, NetworkPrefix, ScriptHash};
use ergo_wallet::chain::amount::BoxValue;
use ergo_wallet::chain::collections::{OutputBoxes, UnspentBoxes};
use ergo_wallet::chain::context::ErgoStateContext;
use ergo_wallet::chain::ergo_box::{BoxId, ErgoBoxCandidate, TxId, UnspentBox};
use ergo_wallet::chain::token::{Token, TokenId};
use ergo_wallet::crypto::keys::SecretKey;
use ergo_wallet::transaction::signing::verify_transaction;
use ergo_wallet::transaction::types::Transaction;
use ergo_wallet::wallet::create_signed_transaction;

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";
const RED: &str = "\x1b[31m";

const BG_BLUE: &str = "\x1b[44m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn banner() {
    println!();
    println!(
        "{BG_BLUE}{BOLD}{WHITE}                                                                    {RESET}"
    );
    println!(
        "{BG_BLUE}{BOLD}{WHITE}    ERGO WALLET CORE  --  Interactive Spending Demo                 {RESET}"
    );
    println!(
        "{BG_BLUE}{BOLD}{WHITE}    Ed25519 + BLAKE3 + Bech32  |  value conserved to the unit       {RESET}"
    );
    println!(
        "{BG_BLUE}{BOLD}{WHITE}                                                                    {RESET}"
    );
    println!();
}

fn section(num: u32, title: &str) {
    println!();
    println!(
        "{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]=============================================================={RESET}"
    );
    println!("{BOLD}{WHITE}  {title}{RESET}");
    println!(
        "{CYAN}------------------------------------------------------------------------{RESET}"
    );
}

fn success(text: &str) {
    println!("{GREEN}  [OK] {text}{RESET}");
}

fn failure(text: &str) {
    println!("{RED}  [REJECTED] {text}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn timing(label: &str, elapsed: std::time::Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}{MAGENTA}  [{label}: {ms:.2} ms]{RESET}");
}

fn short(s: &str) -> String {
    if s.len() <= 16 {
        s.to_string()
    } else {
        format!("{}...{}", &s[..8], &s[s.len() - 8..])
    }
}

// ---------------------------------------------------------------------------
// Demo fixtures
// ---------------------------------------------------------------------------

fn funding_box(id_byte: u8, value: u64, tokens: Vec<Token>, owner: &SecretKey) -> UnspentBox {
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

fn context_json() -> String {
    format!(
        r#"{{
            "currentHeight": 102,
            "lastHeaders": [
                {{"version": 1, "id": "{id}", "parentId": "{parent}", "height": 102, "timestamp": 1693000000000}}
            ]
        }}"#,
        id = "66".repeat(32),
        parent = "00".repeat(32),
    )
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<(), Box<dyn std::error::Error>> {
    banner();

    // --- Step 1: identities -----------------------------------------------
    section(1, "Key generation and address derivation");
    let t = Instant::now();
    let alice = SecretKey::generate();
    let bob = SecretKey::generate();
    let alice_addr = Address::p2pk(&alice.public_key(), NetworkPrefix::Mainnet);
    let bob_addr = Address::p2pk(&bob.public_key(), NetworkPrefix::Mainnet);
    timing("keygen", t.elapsed());
    info("Alice", &short(&alice_addr.encode()));
    info("Bob", &short(&bob_addr.encode()));
    success("two identities derived (BLAKE3 over Ed25519 public keys)");

    // --- Step 2: chain context --------------------------------------------
    section(2, "Parsing the chain state context");
    let context = ErgoStateContext::from_json(&context_json())?;
    info("current height", &context.current_height().to_string());
    info("headers", &context.last_headers().len().to_string());
    success("context validated: newest header matches the declared height");

    // --- Step 3: funding --------------------------------------------------
    section(3, "Alice's unspent boxes");
    let demo_token = Token::new(TokenId::new([7u8; 32]), BoxValue::new(100));
    let funding = vec![
        funding_box(1, 60_000_000, vec![demo_token.clone()], &alice),
        funding_box(2, 60_000_000, vec![], &alice),
    ];
    let unspent = UnspentBoxes::new(funding.clone())?;
    for b in unspent.as_slice() {
        info(
            &format!("box {}", short(&b.box_id.to_hex())),
            &format!("{} units, {} token(s)", b.value.raw(), b.assets.len()),
        );
    }

    // --- Step 4: spend ----------------------------------------------------
    section(4, "Paying Bob 80M plus 30 tokens");
    let mut payment = ErgoBoxCandidate::pay_to_address(
        &bob_addr,
        BoxValue::new(80_000_000),
        context.current_height(),
    );
    payment.assets = vec![Token::new(demo_token.token_id, BoxValue::new(30))];
    let outputs = OutputBoxes::single(payment);

    let t = Instant::now();
    let tx = create_signed_transaction(
        &context,
        &unspent,
        None,
        &outputs,
        &alice_addr,
        BoxValue::new(1_000_000),
        BoxValue::new(1_000_000),
        &alice,
    )?;
    timing("select+build+sign", t.elapsed());

    info("transaction id", &short(&tx.id.to_hex()));
    info("inputs", &tx.inputs.len().to_string());
    info("outputs", &tx.outputs.len().to_string());
    let out_sum: u64 = tx.outputs.iter().map(|o| o.value.raw()).sum();
    info("output sum", &out_sum.to_string());
    success("balanced: payment + change + fee equal the inputs exactly");

    // --- Step 5: verification and serialization ---------------------------
    section(5, "Verification and the JSON exchange format");
    let t = Instant::now();
    verify_transaction(&tx, &context, &funding)?;
    timing("verify", t.elapsed());
    success("every input proof verifies against this chain state");

    let json = tx.to_json()?;
    let parsed = Transaction::from_json(&json)?;
    assert_eq!(parsed, tx);
    info("serialized size", &format!("{} bytes", json.len()));
    success("round trip is exact, id revalidated on parse");

    // --- Step 6: the failure tour -----------------------------------------
    section(6, "What the wallet refuses to do");

    let too_much = OutputBoxes::single(ErgoBoxCandidate::pay_to_address(
        &bob_addr,
        BoxValue::new(500_000_000),
        context.current_height(),
    ));
    match create_signed_transaction(
        &context,
        &unspent,
        None,
        &too_much,
        &alice_addr,
        BoxValue::new(1_000_000),
        BoxValue::new(1_000_000),
        &alice,
    ) {
        Err(e) => failure(&format!("overspend: {e}")),
        Ok(_) => unreachable!("overspend must not succeed"),
    }

    let small = OutputBoxes::single(ErgoBoxCandidate::pay_to_address(
        &bob_addr,
        BoxValue::new(10_000_000),
        context.current_height(),
    ));
    match create_signed_transaction(
        &context,
        &unspent,
        None,
        &small,
        &alice_addr,
        BoxValue::new(1_000_000),
        BoxValue::new(1_000_000),
        &bob, // Bob does not own Alice's boxes
    ) {
        Err(e) => failure(&format!("wrong key: {e}")),
        Ok(_) => unreachable!("theft must not succeed"),
    }

    println!();
    println!("{BOLD}{GREEN}  Demo complete.{RESET}");
    println!();
    Ok(())
}
