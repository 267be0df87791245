//! Application services - Use case implementations

mod department_service;
mod isolation_enforcer;

pub use department_service::{DepartmentChange, DepartmentService};
pub use isolation_enforcer::{IsolationEnforcer, guard, guarded};
