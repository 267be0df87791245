//! Isolation settings

use domain::{DepartmentFilterScope, IsolationFilterBuilder};
use serde::{Deserialize, Serialize};

/// Isolation enforcement configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsolationAppConfig {
    /// Which columns a department-level filter constrains
    ///
    /// `tenant_and_department` (default) or `full_chain`.
    #[serde(default)]
    pub department_filter: DepartmentFilterScope,

    /// Names of the headers carrying the caller's scope
    #[serde(default)]
    pub headers: ContextHeaderNames,
}

impl IsolationAppConfig {
    /// Filter builder honouring the configured department scope
    pub fn filter_builder(&self) -> IsolationFilterBuilder {
        IsolationFilterBuilder::new().with_department_scope(self.department_filter)
    }
}

/// Header names read by the header context provider
///
/// Matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextHeaderNames {
    /// Header carrying the tenant id
    #[serde(default = "default_tenant_header")]
    pub tenant: String,

    /// Header carrying the organization id
    #[serde(default = "default_organization_header")]
    pub organization: String,

    /// Header carrying the department id
    #[serde(default = "default_department_header")]
    pub department: String,

    /// Header carrying the user id
    #[serde(default = "default_user_header")]
    pub user: String,
}

fn default_tenant_header() -> String {
    "x-tenant-id".to_string()
}

fn default_organization_header() -> String {
    "x-organization-id".to_string()
}

fn default_department_header() -> String {
    "x-department-id".to_string()
}

fn default_user_header() -> String {
    "x-user-id".to_string()
}

impl Default for ContextHeaderNames {
    fn default() -> Self {
        Self {
            tenant: default_tenant_header(),
            organization: default_organization_header(),
            department: default_department_header(),
            user: default_user_header(),
        }
    }
}
