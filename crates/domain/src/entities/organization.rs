//! Organization aggregate - groups departments inside a tenant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    aggregate::{IsolatedEvent, IsolationAware, IsolationGuard},
    errors::DomainError,
    value_objects::{DepartmentId, IsolationContext, IsolationLevel, OrganizationId, TenantId},
};

/// Changes raised by an [`Organization`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrganizationEvent {
    /// Organization was created
    Created { name: String },
    /// Organization was renamed
    Renamed { from: String, to: String },
    /// A department was attached
    DepartmentAdded { department_id: DepartmentId },
}

/// An organization inside a tenant
#[derive(Debug, Clone)]
pub struct Organization {
    /// Unique identifier
    pub id: OrganizationId,
    /// Owning tenant
    pub tenant_id: TenantId,
    /// Display name
    pub name: String,
    /// Departments attached to this organization
    pub department_ids: Vec<DepartmentId>,
    /// Incremented on every change
    pub version: u64,
    /// When the organization was created
    pub created_at: DateTime<Utc>,
    /// When the organization last changed
    pub updated_at: DateTime<Utc>,
    isolation: IsolationGuard,
    pending_events: Vec<IsolatedEvent<OrganizationEvent>>,
}

impl Organization {
    const ENTITY: &'static str = "Organization";

    /// Create an organization in `tenant_id`
    ///
    /// Needs a tenant-level context for that tenant (or a platform context).
    pub fn create(
        context: IsolationContext,
        tenant_id: TenantId,
        name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let isolation = IsolationGuard::new(context);
        isolation.ensure_level(IsolationLevel::Tenant, "createOrganization")?;
        isolation.ensure_same_tenant(tenant_id, Self::ENTITY)?;

        let name = validate_name(name.into())?;
        let now = Utc::now();
        let mut organization = Self {
            id: OrganizationId::new(),
            tenant_id,
            name: name.clone(),
            department_ids: Vec::new(),
            version: 1,
            created_at: now,
            updated_at: now,
            isolation,
            pending_events: Vec::new(),
        };
        organization.raise(OrganizationEvent::Created { name })?;
        Ok(organization)
    }

    /// Rename the organization
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), DomainError> {
        self.ensure_own_scope("renameOrganization")?;

        let name = validate_name(name.into())?;
        if name == self.name {
            return Ok(());
        }
        let from = std::mem::replace(&mut self.name, name.clone());
        self.touch();
        self.raise(OrganizationEvent::Renamed { from, to: name })?;
        Ok(())
    }

    /// Attach a department to this organization
    ///
    /// Needs an organization-level context for this organization.
    pub fn add_department(&mut self, department_id: DepartmentId) -> Result<(), DomainError> {
        self.ensure_own_scope("addDepartment")?;

        if self.department_ids.contains(&department_id) {
            return Err(DomainError::ValidationError(format!(
                "department {department_id} already belongs to organization {}",
                self.id
            )));
        }
        self.department_ids.push(department_id);
        self.touch();
        self.raise(OrganizationEvent::DepartmentAdded { department_id })?;
        Ok(())
    }

    /// Check if a department is attached
    pub fn has_department(&self, department_id: &DepartmentId) -> bool {
        self.department_ids.contains(department_id)
    }

    /// Events raised since the last call
    pub fn take_pending_events(&mut self) -> Vec<IsolatedEvent<OrganizationEvent>> {
        std::mem::take(&mut self.pending_events)
    }

    /// Events raised and not yet taken
    pub fn pending_events(&self) -> &[IsolatedEvent<OrganizationEvent>] {
        &self.pending_events
    }

    fn ensure_own_scope(&self, operation: &str) -> Result<(), DomainError> {
        self.isolation
            .ensure_level(IsolationLevel::Organization, operation)?;
        self.isolation.ensure_same_tenant(self.tenant_id, Self::ENTITY)?;
        self.isolation.ensure_same_organization(self.id, Self::ENTITY)?;
        Ok(())
    }

    fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }

    fn raise(&mut self, payload: OrganizationEvent) -> Result<(), DomainError> {
        self.isolation.publish_event(
            &mut self.pending_events,
            self.id.as_uuid(),
            self.version,
            |aggregate_id, version, context| {
                IsolatedEvent::new(aggregate_id, version, context, payload)
            },
        )?;
        Ok(())
    }
}

impl IsolationAware for Organization {
    fn isolation(&self) -> &IsolationGuard {
        &self.isolation
    }
}

pub(crate) fn validate_name(name: String) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::ValidationError("name must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}
