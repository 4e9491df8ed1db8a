//! Error types for duxide operations.

use crate::Path;
use thiserror::Error;

/// Result type alias for duxide operations.
pub type DuxideResult<T> = Result<T, DuxideError>;

/// Errors raised by registration, reduction, and draft writes.
#[derive(Debug, Error)]
pub enum DuxideError {
    /// A required value is missing or malformed (e.g. an empty action type).
    #[error("validation failed: {message}")]
    Validation {
        /// Description of what was rejected.
        message: String,
    },

    /// Builder registration was called out of its allowed order.
    #[error("{first} must be called before {second}")]
    Sequencing {
        /// The registration that has to come first.
        first: &'static str,
        /// The registration that came too early.
        second: &'static str,
    },

    /// The same action type was registered twice.
    #[error("action type already registered: {kind}")]
    DuplicateAction {
        /// The repeated action type.
        kind: String,
    },

    /// A reducer was invoked without the state it requires.
    #[error("invalid state: {message}")]
    InvalidState {
        /// Description of the missing state.
        message: String,
    },

    /// A draft write hit a value of the wrong shape.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// The path where the mismatch occurred.
        path: Path,
        /// The expected shape.
        expected: &'static str,
        /// The shape actually found.
        found: &'static str,
    },

    /// A draft write indexed past the end of a sequence.
    #[error("index {index} out of bounds (len: {len}) at path {path}")]
    IndexOutOfBounds {
        /// The path to the sequence.
        path: Path,
        /// The index that was accessed.
        index: usize,
        /// The actual length of the sequence.
        len: usize,
    },

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DuxideError {
    /// Create a validation error.
    #[inline]
    pub fn validation(message: impl Into<String>) -> Self {
        DuxideError::Validation {
            message: message.into(),
        }
    }

    /// Create a sequencing error (`first` must precede `second`).
    #[inline]
    pub fn sequencing(first: &'static str, second: &'static str) -> Self {
        DuxideError::Sequencing { first, second }
    }

    /// Create a duplicate-action error.
    #[inline]
    pub fn duplicate_action(kind: impl Into<String>) -> Self {
        DuxideError::DuplicateAction { kind: kind.into() }
    }

    /// Create an invalid-state error.
    #[inline]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        DuxideError::InvalidState {
            message: message.into(),
        }
    }

    /// Create a type-mismatch error.
    #[inline]
    pub fn type_mismatch(path: Path, expected: &'static str, found: &'static str) -> Self {
        DuxideError::TypeMismatch {
            path,
            expected,
            found,
        }
    }

    /// Create an index-out-of-bounds error.
    #[inline]
    pub fn index_out_of_bounds(path: Path, index: usize, len: usize) -> Self {
        DuxideError::IndexOutOfBounds { path, index, len }
    }
}
