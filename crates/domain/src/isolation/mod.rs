//! Multi-level data isolation
//!
//! - [`IsolationValidator`] - accept or reject an operation for a context
//! - [`IsolationFilterBuilder`] - derive the equality filter a query must apply
//! - [`IsolationScoped`] - records carrying isolation columns

mod filter;
mod scoped;
mod validator;

pub use filter::{DepartmentFilterScope, IsolationFilter, IsolationFilterBuilder};
pub use scoped::IsolationScoped;
pub use validator::IsolationValidator;
