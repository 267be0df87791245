//! Application-level errors

use domain::{DomainError, IsolationError};
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Isolation check rejected the operation
    #[error(transparent)]
    Isolation(#[from] IsolationError),

    /// Domain-level error
    #[error(transparent)]
    Domain(DomainError),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persistence collaborator failed
    #[error("Repository error: {0}")]
    Repository(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Isolation(e) => Self::Isolation(e),
            other => Self::Domain(other),
        }
    }
}

impl ApplicationError {
    /// Check if this error is retryable
    ///
    /// Isolation rejections never are: retrying without a different
    /// context fails the same way.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Repository(_))
    }

    /// Check if this error is an isolation rejection
    pub const fn is_isolation_violation(&self) -> bool {
        matches!(self, Self::Isolation(_))
    }

    /// Get the isolation error, if this is one
    pub const fn as_isolation(&self) -> Option<&IsolationError> {
        match self {
            Self::Isolation(e) => Some(e),
            _ => None,
        }
    }
}
