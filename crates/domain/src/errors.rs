//! Domain-level errors

use thiserror::Error;

use crate::value_objects::{IsolationField, IsolationLevel};

/// Rejection of an operation by the isolation checks
///
/// None of these are transient: retrying without changing the context
/// fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsolationError {
    /// No isolation context was available
    #[error("Isolation context is missing")]
    MissingContext,

    /// The context does not carry the scope the operation requires
    #[error(
        "Insufficient isolation level for '{operation}': requires {required}, context is {current}"
    )]
    InsufficientLevel {
        current: IsolationLevel,
        required: IsolationLevel,
        operation: String,
    },

    /// Two scopes expected to match do not
    #[error("Cross-scope access to {entity}: {field} differs at {level} level")]
    CrossScope {
        entity: String,
        field: IsolationField,
        level: IsolationLevel,
    },
}

impl IsolationError {
    /// Create an insufficient level error
    pub fn insufficient_level(
        current: IsolationLevel,
        required: IsolationLevel,
        operation: impl Into<String>,
    ) -> Self {
        Self::InsufficientLevel {
            current,
            required,
            operation: operation.into(),
        }
    }

    /// Create a cross-scope error for a mismatched field
    ///
    /// The reported level is the level the field belongs to.
    pub fn cross_scope(entity: impl Into<String>, field: IsolationField) -> Self {
        Self::CrossScope {
            entity: entity.into(),
            field,
            level: field.level(),
        }
    }
}

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Isolation check rejected the operation
    #[error(transparent)]
    Isolation(#[from] IsolationError),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Operation not permitted
    #[error("Operation not permitted: {0}")]
    NotPermitted(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Get the isolation error, if this is one
    pub const fn as_isolation(&self) -> Option<&IsolationError> {
        match self {
            Self::Isolation(e) => Some(e),
            _ => None,
        }
    }
}
