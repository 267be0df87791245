//! Domain entities - Objects with identity and lifecycle

mod department;
mod organization;

pub use department::{Department, DepartmentEvent, DepartmentRecord};
pub use organization::{Organization, OrganizationEvent};
