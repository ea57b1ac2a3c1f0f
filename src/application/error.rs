//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// A state handed to `set_state` breaks a registry or history invariant.
    #[error("invalid ledger state: {message}")]
    InvalidState { message: String },

    #[error("replay failed at history line {line} ({command}): {source}")]
    Replay {
        line: usize,
        command: String,
        #[source]
        source: DomainError,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
