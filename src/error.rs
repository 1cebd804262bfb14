//! Error types for puzzle operations.

use thiserror::Error;

/// Result type for puzzle operations.
pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum Error {
    /// Slice id outside `0..=8`.
    #[error("invalid slice {0}: expected 0..=8")]
    InvalidSlice(usize),

    /// Turn direction other than +1 or -1.
    #[error("invalid direction {0}: expected +1 or -1")]
    InvalidDirection(i32),

    /// A rotation is still animating or committing.
    #[error("a rotation is already in progress")]
    AnimationInProgress,

    /// A commit would corrupt the slice index. Indicates a bug.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
