//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod department_repository;
mod isolation_context_provider;

pub use department_repository::DepartmentRepository;
#[cfg(test)]
pub use department_repository::MockDepartmentRepository;
pub use isolation_context_provider::IsolationContextProvider;
#[cfg(test)]
pub use isolation_context_provider::MockIsolationContextProvider;
