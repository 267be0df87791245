//! Domain layer for multi-level data isolation
//!
//! Contains the isolation value objects, the validator and filter builder,
//! aggregate guards, and domain errors. Every check here is a pure,
//! synchronous comparison; nothing in this crate logs or performs I/O.

pub mod aggregate;
pub mod entities;
pub mod errors;
pub mod isolation;
pub mod value_objects;

pub use aggregate::{IsolatedEvent, IsolationAware, IsolationGuard};
pub use entities::*;
pub use errors::{DomainError, IsolationError};
pub use isolation::{
    DepartmentFilterScope, IsolationFilter, IsolationFilterBuilder, IsolationScoped,
    IsolationValidator,
};
pub use value_objects::*;
