//! # Protocol Configuration & Constants
//!
//! Every magic number in the wallet core lives here. Consensus-relevant
//! values (the token slot bound, the miner-fee script hash) must match the
//! network they are used against; changing them produces transactions the
//! chain will reject.

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Human-readable prefix for mainnet addresses.
pub const MAINNET_HRP: &str = "ergo";

/// Human-readable prefix for testnet addresses. A distinct HRP means a
/// testnet address can never be mistaken for (or sent to) a mainnet one.
pub const TESTNET_HRP: &str = "tergo";

// ---------------------------------------------------------------------------
// Box Parameters
// ---------------------------------------------------------------------------

/// Maximum number of distinct token ids a single box may carry.
///
/// This is a consensus bound: token aggregation that would produce a box
/// with more distinct tokens than this fails rather than splitting
/// implicitly.
pub const MAX_TOKENS_PER_BOX: usize = 255;

/// Token identifiers are 32-byte digests.
pub const TOKEN_ID_LENGTH: usize = 32;

/// Box identifiers are 32-byte digests.
pub const BOX_ID_LENGTH: usize = 32;

/// Spending scripts are referenced by their 32-byte BLAKE3 hash.
pub const SCRIPT_HASH_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 secret keys are 32 bytes.
pub const SECRET_KEY_LENGTH: usize = 32;

/// Ed25519 public keys are 32 bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signatures are 64 bytes. A spending proof that is not exactly
/// this long fails verification, it never panics.
pub const SIGNATURE_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Fee
// ---------------------------------------------------------------------------

/// Script hash of the miner-fee claim script.
///
/// The fee is not a side channel: it is an ordinary output paying this
/// well-known script, appended last by the transaction builder. Keeping the
/// fee inside the output list makes value conservation a literal equation
/// over inputs and outputs.
pub const MINER_FEE_SCRIPT_HASH: [u8; SCRIPT_HASH_LENGTH] = [
    0x6d, 0x69, 0x6e, 0x65, 0x72, 0x2d, 0x66, 0x65, 0x65, 0x2d, 0x63, 0x6c, 0x61, 0x69, 0x6d,
    0x2d, 0x73, 0x63, 0x72, 0x69, 0x70, 0x74, 0x2d, 0x76, 0x31, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00,
];

// ---------------------------------------------------------------------------
// Registers
// ---------------------------------------------------------------------------

/// Number of optional (non-mandatory) registers a box may carry: R4..R9.
pub const NON_MANDATORY_REGISTER_COUNT: usize = 6;
