//! Error types for the Orca configuration repository.

use thiserror::Error;

/// Result type alias for configuration store operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur while reading or writing application configuration.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid trainer endpoint: {0}")]
    Endpoint(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl StateError {
    /// Whether this error means the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StateError::NotFound(_))
    }
}
