//! Ordered box collections with construction-time validation.
//!
//! The selector, builder, and signer all consume these instead of bare
//! `Vec`s so that "non-empty" and "no duplicate box identity" are facts
//! established once, at the boundary, rather than re-checked (or worse,
//! assumed) in every component.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::ergo_box::{BoxId, ErgoBoxCandidate, UnspentBox};

/// Errors from collection construction and JSON parsing.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// The collection would be empty.
    #[error("{0} collection must not be empty")]
    Empty(&'static str),

    /// The same box identity appears twice.
    #[error("duplicate box in collection: {0}")]
    DuplicateBox(BoxId),

    /// The JSON text does not match the expected schema.
    #[error("malformed box collection JSON: {0}")]
    Json(String),
}

fn check_unique(boxes: &[UnspentBox]) -> Result<(), CollectionError> {
    for (i, b) in boxes.iter().enumerate() {
        if boxes[..i].iter().any(|prev| prev.box_id == b.box_id) {
            return Err(CollectionError::DuplicateBox(b.box_id));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// UnspentBoxes
// ---------------------------------------------------------------------------

/// The caller's spendable boxes, in the order selection will consider them.
///
/// Ordering is significant: the selector walks this sequence front to back,
/// so the caller's ordering *is* the selection policy input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<UnspentBox>", into = "Vec<UnspentBox>")]
pub struct UnspentBoxes(Vec<UnspentBox>);

impl UnspentBoxes {
    /// Build from a vector, rejecting empty input and duplicate identities.
    pub fn new(boxes: Vec<UnspentBox>) -> Result<Self, CollectionError> {
        if boxes.is_empty() {
            return Err(CollectionError::Empty("unspent boxes"));
        }
        check_unique(&boxes)?;
        Ok(Self(boxes))
    }

    /// Parse a JSON array of unspent boxes.
    pub fn from_json(json: &str) -> Result<Self, CollectionError> {
        serde_json::from_str(json).map_err(|e| CollectionError::Json(e.to_string()))
    }

    /// The boxes, in caller order.
    pub fn as_slice(&self) -> &[UnspentBox] {
        &self.0
    }

    /// Number of boxes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: emptiness is rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<UnspentBox>> for UnspentBoxes {
    type Error = CollectionError;

    fn try_from(boxes: Vec<UnspentBox>) -> Result<Self, Self::Error> {
        Self::new(boxes)
    }
}

impl From<UnspentBoxes> for Vec<UnspentBox> {
    fn from(boxes: UnspentBoxes) -> Self {
        boxes.0
    }
}

// ---------------------------------------------------------------------------
// DataInputBoxes
// ---------------------------------------------------------------------------

/// Boxes referenced read-only by a transaction, without being spent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<UnspentBox>", into = "Vec<UnspentBox>")]
pub struct DataInputBoxes(Vec<UnspentBox>);

impl DataInputBoxes {
    /// Build from a vector, rejecting empty input and duplicate identities.
    pub fn new(boxes: Vec<UnspentBox>) -> Result<Self, CollectionError> {
        if boxes.is_empty() {
            return Err(CollectionError::Empty("data input boxes"));
        }
        check_unique(&boxes)?;
        Ok(Self(boxes))
    }

    /// Parse a JSON array of data input boxes.
    pub fn from_json(json: &str) -> Result<Self, CollectionError> {
        serde_json::from_str(json).map_err(|e| CollectionError::Json(e.to_string()))
    }

    /// The boxes, in caller order.
    pub fn as_slice(&self) -> &[UnspentBox] {
        &self.0
    }

    /// Number of boxes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: emptiness is rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<UnspentBox>> for DataInputBoxes {
    type Error = CollectionError;

    fn try_from(boxes: Vec<UnspentBox>) -> Result<Self, Self::Error> {
        Self::new(boxes)
    }
}

impl From<DataInputBoxes> for Vec<UnspentBox> {
    fn from(boxes: DataInputBoxes) -> Self {
        boxes.0
    }
}

// ---------------------------------------------------------------------------
// OutputBoxes
// ---------------------------------------------------------------------------

/// The requested payment outputs, in the order they will appear in the
/// transaction. Candidates have no identity yet, so only non-emptiness is
/// enforced here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ErgoBoxCandidate>", into = "Vec<ErgoBoxCandidate>")]
pub struct OutputBoxes(Vec<ErgoBoxCandidate>);

impl OutputBoxes {
    /// Build from a vector, rejecting empty input.
    pub fn new(candidates: Vec<ErgoBoxCandidate>) -> Result<Self, CollectionError> {
        if candidates.is_empty() {
            return Err(CollectionError::Empty("output boxes"));
        }
        Ok(Self(candidates))
    }

    /// A single-output collection.
    pub fn single(candidate: ErgoBoxCandidate) -> Self {
        Self(vec![candidate])
    }

    /// The candidates, in caller order.
    pub fn as_slice(&self) -> &[ErgoBoxCandidate] {
        &self.0
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: emptiness is rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<ErgoBoxCandidate>> for OutputBoxes {
    type Error = CollectionError;

    fn try_from(candidates: Vec<ErgoBoxCandidate>) -> Result<Self, Self::Error> {
        Self::new(candidates)
    }
}

impl From<OutputBoxes> for Vec<ErgoBoxCandidate> {
    fn from(boxes: OutputBoxes) -> Self {
        boxes.0
    }
}
