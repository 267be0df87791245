//! Query filters derived from an isolation context
//!
//! The filter is an equality map (AND across entries) handed verbatim to
//! the persistence layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{IsolationScoped, IsolationValidator};
use crate::{
    errors::IsolationError,
    value_objects::{IsolationContext, IsolationField, IsolationLevel},
};

/// Field → value equality filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IsolationFilter(BTreeMap<IsolationField, Uuid>);

impl IsolationFilter {
    /// Filter with no restrictions
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Value required for `field`, if restricted
    pub fn get(&self, field: IsolationField) -> Option<Uuid> {
        self.0.get(&field).copied()
    }

    /// Check if `field` is restricted
    pub fn contains(&self, field: IsolationField) -> bool {
        self.0.contains_key(&field)
    }

    /// Number of restricted fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the filter restricts nothing
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over restrictions in field order
    pub fn iter(&self) -> impl Iterator<Item = (IsolationField, Uuid)> + '_ {
        self.0.iter().map(|(field, value)| (*field, *value))
    }

    /// Restricted fields in field order
    pub fn fields(&self) -> Vec<IsolationField> {
        self.0.keys().copied().collect()
    }

    /// Check if a stored record satisfies every restriction
    pub fn matches<R: IsolationScoped + ?Sized>(&self, record: &R) -> bool {
        self.iter()
            .all(|(field, value)| record.scope_value(field) == Some(value))
    }

    fn insert_from(&mut self, context: &IsolationContext, field: IsolationField) {
        if let Some(value) = context.get(field) {
            self.0.insert(field, value);
        }
    }
}

/// How department-level filters are shaped
///
/// `TenantAndDepartment` filters by `{tenantId, departmentId}` and relies on
/// department ids being unique within a tenant. `FullChain` also pins the
/// organization for stores where department ids are only unique per
/// organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentFilterScope {
    /// `{tenantId, departmentId}`
    #[default]
    TenantAndDepartment,
    /// `{tenantId, organizationId, departmentId}`
    FullChain,
}

/// Builds query filters from validated contexts
///
/// # Examples
///
/// ```
/// use domain::{IsolationContext, IsolationField, IsolationFilterBuilder, IsolationLevel};
/// use domain::{OrganizationId, TenantId};
///
/// let t = TenantId::new();
/// let o = OrganizationId::new();
/// let ctx = IsolationContext::for_organization(t, o);
///
/// let filter = IsolationFilterBuilder::new()
///     .build_filter(Some(&ctx), IsolationLevel::Organization)
///     .unwrap();
/// assert_eq!(filter.get(IsolationField::TenantId), Some(t.as_uuid()));
/// assert_eq!(filter.get(IsolationField::OrganizationId), Some(o.as_uuid()));
/// assert_eq!(filter.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsolationFilterBuilder {
    department_scope: DepartmentFilterScope,
}

impl IsolationFilterBuilder {
    /// Builder with the default department filter shape
    pub const fn new() -> Self {
        Self {
            department_scope: DepartmentFilterScope::TenantAndDepartment,
        }
    }

    /// Use a specific department filter shape
    #[must_use]
    pub const fn with_department_scope(mut self, scope: DepartmentFilterScope) -> Self {
        self.department_scope = scope;
        self
    }

    /// The configured department filter shape
    pub const fn department_scope(&self) -> DepartmentFilterScope {
        self.department_scope
    }

    /// Fields a filter at `level` restricts
    pub fn fields_for(&self, level: IsolationLevel) -> &'static [IsolationField] {
        match level {
            IsolationLevel::Platform => &[],
            IsolationLevel::Tenant => &[IsolationField::TenantId],
            IsolationLevel::Organization => {
                &[IsolationField::TenantId, IsolationField::OrganizationId]
            },
            IsolationLevel::Department => match self.department_scope {
                DepartmentFilterScope::TenantAndDepartment => {
                    &[IsolationField::TenantId, IsolationField::DepartmentId]
                },
                DepartmentFilterScope::FullChain => &[
                    IsolationField::TenantId,
                    IsolationField::OrganizationId,
                    IsolationField::DepartmentId,
                ],
            },
            IsolationLevel::User => &[IsolationField::UserId],
        }
    }

    /// Validate `context` against `level` and derive its filter
    ///
    /// Fails exactly like [`IsolationValidator::require_level`]. A platform
    /// context always gets an empty filter.
    pub fn build_filter(
        &self,
        context: Option<&IsolationContext>,
        level: IsolationLevel,
    ) -> Result<IsolationFilter, IsolationError> {
        let context = IsolationValidator::require_level(context, level, "buildFilter")?;
        let mut filter = IsolationFilter::unrestricted();
        if context.is_platform() {
            return Ok(filter);
        }
        for field in self.fields_for(level) {
            filter.insert_from(context, *field);
        }
        Ok(filter)
    }
}
