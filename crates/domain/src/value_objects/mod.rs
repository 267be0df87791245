//! Value Objects - Immutable, identity-less domain primitives

mod department_id;
mod isolation_context;
mod isolation_level;
mod organization_id;
mod tenant_id;
mod user_id;

pub use department_id::DepartmentId;
pub use isolation_context::{IsolationContext, IsolationContextBuilder};
pub use isolation_level::{IsolationField, IsolationLevel};
pub use organization_id::OrganizationId;
pub use tenant_id::TenantId;
pub use user_id::UserId;
