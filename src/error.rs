// error.rs - Error types for the comparison core

use thiserror::Error;

/// Errors raised while building a sequence store or comparing its pairs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistanceError {
    /// Ragged alignment: a sequence does not match the store width
    #[error(
        "alignment shape mismatch: '{id}' has {length} columns but '{reference_id}' has {expected}"
    )]
    AlignmentShape {
        reference_id: String,
        expected: usize,
        id: String,
        length: usize,
    },

    #[error("cannot compare sequences of different lengths ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("duplicate sequence identifier '{0}' in alignment")]
    DuplicateIdentifier(String),

    #[error("pairwise comparison cancelled after {completed} of {total} pairs")]
    Cancelled { completed: usize, total: usize },
}

impl From<DistanceError> for String {
    fn from(err: DistanceError) -> Self {
        err.to_string()
    }
}
