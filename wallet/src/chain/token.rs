//! Multi-asset token balances.
//!
//! A box may carry an ordered list of (token id, amount) pairs alongside its
//! native value. Aggregation across boxes merges by token id with the same
//! checked arithmetic as plain values, and respects the per-box slot bound.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::chain::amount::{ArithmeticError, BoxValue};
use crate::config::{MAX_TOKENS_PER_BOX, TOKEN_ID_LENGTH};

/// Errors from token id parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenIdError {
    /// The token id text is not valid hex.
    #[error("token id is not valid hex: {0}")]
    InvalidHex(String),

    /// The decoded token id has the wrong length.
    #[error("token id must be {TOKEN_ID_LENGTH} bytes, got {got}")]
    InvalidLength { got: usize },
}

// ---------------------------------------------------------------------------
// TokenId
// ---------------------------------------------------------------------------

/// A 32-byte token identifier, hex-encoded in the JSON exchange format.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId([u8; TOKEN_ID_LENGTH]);

impl TokenId {
    /// Wrap raw id bytes.
    pub fn new(bytes: [u8; TOKEN_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse a token id from hex text.
    pub fn from_hex(hex_str: &str) -> Result<Self, TokenIdError> {
        let bytes =
            hex::decode(hex_str).map_err(|e| TokenIdError::InvalidHex(e.to_string()))?;
        if bytes.len() != TOKEN_ID_LENGTH {
            return Err(TokenIdError::InvalidLength { got: bytes.len() });
        }
        let mut arr = [0u8; TOKEN_ID_LENGTH];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The raw id bytes.
    pub fn as_bytes(&self) -> &[u8; TOKEN_ID_LENGTH] {
        &self.0
    }

    /// Hex encoding of the id.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({})", self.to_hex())
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for TokenId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TokenId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A (token id, amount) pair as carried by a box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The asset being counted.
    #[serde(rename = "tokenId")]
    pub token_id: TokenId,
    /// How much of it, in the token's smallest unit.
    pub amount: BoxValue,
}

impl Token {
    /// Create a token entry.
    pub fn new(token_id: TokenId, amount: BoxValue) -> Self {
        Self { token_id, amount }
    }
}

/// Fold one token entry into a running merge, summing by id.
///
/// First-seen id order is preserved. Used by the selector and builder for
/// running totals that are not themselves destined for a single box, so no
/// slot bound is applied here.
pub(crate) fn accumulate_token(
    merged: &mut Vec<Token>,
    token: &Token,
) -> Result<(), ArithmeticError> {
    match merged.iter_mut().find(|t| t.token_id == token.token_id) {
        Some(existing) => {
            existing.amount = existing.amount.checked_add(token.amount)?;
        }
        None => merged.push(*token),
    }
    Ok(())
}

/// Merge token sequences by id, summing amounts with checked arithmetic.
///
/// Ids keep their first-seen order, so aggregation is deterministic for a
/// given input ordering. Fails with [`ArithmeticError::AmountOverflow`] if a
/// per-id sum wraps, or [`ArithmeticError::TooManyTokens`] if the merged
/// result has more distinct ids than a box may hold.
pub fn sum_tokens<'a, I>(tokens: I) -> Result<Vec<Token>, ArithmeticError>
where
    I: IntoIterator<Item = &'a Token>,
{
    let mut merged: Vec<Token> = Vec::new();
    for token in tokens {
        accumulate_token(&mut merged, token)?;
    }
    if merged.len() > MAX_TOKENS_PER_BOX {
        return Err(ArithmeticError::too_many_tokens(merged.len()));
    }
    Ok(merged)
}

/// Look up the amount of a given token id in a token list, zero if absent.
pub fn token_amount(tokens: &[Token], token_id: &TokenId) -> BoxValue {
    tokens
        .iter()
        .find(|t| &t.token_id == token_id)
        .map(|t| t.amount)
        .unwrap_or(BoxValue::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tid(byte: u8) -> TokenId {
        TokenId::new([byte; TOKEN_ID_LENGTH])
    }

    #[test]
    fn token_id_hex_roundtrip() {
        let id = tid(0xab);
        let recovered = TokenId::from_hex(&id.to_hex()).unwrap();
        assert_eq!(id, recovered);
    }

    #[test]
    fn token_id_rejects_wrong_length() {
        assert_eq!(
            TokenId::from_hex("abcd").unwrap_err(),
            TokenIdError::InvalidLength { got: 2 }
        );
        assert!(matches!(
            TokenId::from_hex("zz").unwrap_err(),
            TokenIdError::InvalidHex(_)
        ));
    }

    #[test]
    fn sum_tokens_merges_by_id_in_first_seen_order() {
        let tokens = vec![
            Token::new(tid(2), BoxValue::new(10)),
            Token::new(tid(1), BoxValue::new(5)),
            Token::new(tid(2), BoxValue::new(7)),
        ];
        let merged = sum_tokens(tokens.iter()).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], Token::new(tid(2), BoxValue::new(17)));
        assert_eq!(merged[1], Token::new(tid(1), BoxValue::new(5)));
    }

    #[test]
    fn sum_tokens_detects_overflow() {
        let tokens = vec![
            Token::new(tid(1), BoxValue::MAX),
            Token::new(tid(1), BoxValue::new(1)),
        ];
        assert!(matches!(
            sum_tokens(tokens.iter()).unwrap_err(),
            ArithmeticError::AmountOverflow { .. }
        ));
    }

    #[test]
    fn sum_tokens_enforces_slot_bound() {
        // One more distinct id than a box may hold.
        let mut tokens = Vec::new();
        for i in 0..=MAX_TOKENS_PER_BOX {
            let mut bytes = [0u8; TOKEN_ID_LENGTH];
            bytes[0] = (i % 256) as u8;
            bytes[1] = (i / 256) as u8;
            tokens.push(Token::new(TokenId::new(bytes), BoxValue::new(1)));
        }
        assert_eq!(
            sum_tokens(tokens.iter()).unwrap_err(),
            ArithmeticError::TooManyTokens {
                count: MAX_TOKENS_PER_BOX + 1,
                limit: MAX_TOKENS_PER_BOX
            }
        );
    }

    #[test]
    fn token_amount_lookup() {
        let tokens = vec![Token::new(tid(1), BoxValue::new(5))];
        assert_eq!(token_amount(&tokens, &tid(1)), BoxValue::new(5));
        assert_eq!(token_amount(&tokens, &tid(9)), BoxValue::ZERO);
    }

    #[test]
    fn token_serde_uses_hex_id() {
        let token = Token::new(tid(0x01), BoxValue::new(100));
        let json = serde_json::to_string(&token).unwrap();
        assert!(json.contains("\"tokenId\""));
        assert!(json.contains(&tid(0x01).to_hex()));
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}
