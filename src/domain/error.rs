//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent ledger rule violations.
///
/// Every operation that can fail reports one of these before it touches any
/// state, so a returned error always means "nothing changed".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Operand of the wrong kind, e.g. a malformed amount or command text.
    #[error("expected {expected}, got {found:?}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// A quantity would leave its permitted range.
    #[error("out of range: {0}")]
    RangeViolation(String),

    /// Subtraction, discard, withdraw or spend exceeds what is available.
    #[error("insufficient {what}: requested {requested}, available {available}")]
    Insufficient {
        what: &'static str,
        requested: String,
        available: String,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    Duplicate(String),

    /// Distribution attempted with a zero balance basis.
    #[error("cannot distribute {0}: no branch holds a positive balance")]
    Degenerate(String),

    #[error("cannot merge branch into itself: {0}")]
    SelfMerge(String),
}

impl DomainError {
    pub(crate) fn type_mismatch(expected: &'static str, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.into(),
        }
    }

    pub(crate) fn insufficient(
        what: &'static str,
        requested: impl ToString,
        available: impl ToString,
    ) -> Self {
        Self::Insufficient {
            what,
            requested: requested.to_string(),
            available: available.to_string(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
