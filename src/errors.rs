//! Error types shared by every structure core, algorithm and the step player
//!
//! This module defines [`VizError`], the typed failure returned by operations that
//! cannot proceed. Expected misses on read-only queries are not errors: they are
//! reported as `warn` steps in the returned sequence instead.
//!
//! A failed operation never changes the state of the structure it was called on.

use thiserror::Error;

/// Failures reported by cores, algorithms, importers and the player
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VizError {
    /// Search/delete miss, or removal from an empty structure
    #[error("not found: {0}")]
    NotFound(String),

    /// Position outside the valid range of a linear structure
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    /// Rejected input (negative weight, unknown command, bad number)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Malformed graph import text; `line` is 1-based
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A step sequence is already being played back
    #[error("player busy: {remaining} step(s) of '{label}' still pending")]
    Busy { label: String, remaining: usize },
}

impl VizError {
    pub fn not_found(what: impl Into<String>) -> Self {
        VizError::NotFound(what.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        VizError::InvalidArgument(message.into())
    }

    /// True for the failures a caller can treat as "nothing there"
    pub fn is_not_found(&self) -> bool {
        matches!(self, VizError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, VizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = VizError::OutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "index 4 out of range for length 2");

        let err = VizError::Parse {
            line: 3,
            message: "matrix is not square".to_string(),
        };
        assert_eq!(err.to_string(), "parse error at line 3: matrix is not square");
    }

    #[test]
    fn test_not_found_helper() {
        assert!(VizError::not_found("queue is empty").is_not_found());
        assert!(!VizError::invalid("x").is_not_found());
    }
}
