//! Checked value arithmetic.
//!
//! Every monetary quantity in the wallet core is a [`BoxValue`]: a `u64`
//! counted in the smallest indivisible unit. No floating point anywhere
//! near money, and no wrapping either — arithmetic that would leave the
//! 64-bit range is an error value, never a silent truncation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::MAX_TOKENS_PER_BOX;

/// Errors produced by checked arithmetic over values and token balances.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    /// An addition or multiplication left the 64-bit range.
    #[error("amount overflow: {a} + {b} exceeds the 64-bit range")]
    AmountOverflow { a: u64, b: u64 },

    /// A subtraction went below zero.
    #[error("amount underflow: cannot subtract {b} from {a}")]
    AmountUnderflow { a: u64, b: u64 },

    /// Token aggregation produced more distinct token ids than a box may hold.
    #[error("too many tokens: {count} distinct token ids, limit is {limit}")]
    TooManyTokens { count: usize, limit: usize },
}

impl ArithmeticError {
    /// The token slot bound violation, with the limit filled in.
    pub(crate) fn too_many_tokens(count: usize) -> Self {
        Self::TooManyTokens {
            count,
            limit: MAX_TOKENS_PER_BOX,
        }
    }
}

/// A non-negative amount in the smallest indivisible unit.
///
/// `BoxValue` is `Copy` and totally ordered; the only way to combine two of
/// them is through the checked operations below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoxValue(u64);

impl BoxValue {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// The largest representable amount.
    pub const MAX: Self = Self(u64::MAX);

    /// Wrap a raw unit count.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw unit count.
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Whether this amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Fails with [`ArithmeticError::AmountOverflow`]
    /// instead of wrapping.
    pub fn checked_add(self, other: Self) -> Result<Self, ArithmeticError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(ArithmeticError::AmountOverflow {
                a: self.0,
                b: other.0,
            })
    }

    /// Checked subtraction. Fails with [`ArithmeticError::AmountUnderflow`]
    /// if `other > self`.
    pub fn checked_sub(self, other: Self) -> Result<Self, ArithmeticError> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(ArithmeticError::AmountUnderflow {
                a: self.0,
                b: other.0,
            })
    }

    /// Checked multiply-by-count, for "n boxes of this value" style sums.
    pub fn checked_mul(self, count: u64) -> Result<Self, ArithmeticError> {
        self.0
            .checked_mul(count)
            .map(Self)
            .ok_or(ArithmeticError::AmountOverflow {
                a: self.0,
                b: count,
            })
    }
}

impl fmt::Display for BoxValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BoxValue {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Sum a sequence of values with checked addition.
pub fn sum_box_values<'a, I>(values: I) -> Result<BoxValue, ArithmeticError>
where
    I: IntoIterator<Item = &'a BoxValue>,
{
    let mut total = BoxValue::ZERO;
    for v in values {
        total = total.checked_add(*v)?;
    }
    Ok(total)
}
