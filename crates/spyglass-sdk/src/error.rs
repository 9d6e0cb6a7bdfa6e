//! SDK error types.

use thiserror::Error;

use spyglass_graphql::{ClientError, PaginationError};

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid configuration: {message}")]
pub struct ConfigError {
    /// What was wrong.
    pub message: String,
}

impl ConfigError {
    /// Create a configuration error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error type for SDK operations.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Client configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A GraphQL operation failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A paginated fetch failed.
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}
