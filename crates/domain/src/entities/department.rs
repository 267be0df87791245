//! Department aggregate - members working inside one organization

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::organization::validate_name;
use crate::{
    aggregate::{IsolatedEvent, IsolationAware, IsolationGuard},
    errors::DomainError,
    isolation::{IsolationScoped, IsolationValidator},
    value_objects::{
        DepartmentId, IsolationContext, IsolationLevel, OrganizationId, TenantId, UserId,
    },
};

/// Changes raised by a [`Department`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DepartmentEvent {
    /// Department was created
    Created {
        organization_id: OrganizationId,
        name: String,
    },
    /// A user joined the department
    MemberAssigned { user_id: UserId },
    /// A user left the department
    MemberRemoved { user_id: UserId },
}

/// Persisted state of a department
///
/// Carries the isolation columns repositories filter on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRecord {
    pub id: DepartmentId,
    pub tenant_id: TenantId,
    pub organization_id: OrganizationId,
    pub name: String,
    pub member_ids: Vec<UserId>,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IsolationScoped for DepartmentRecord {
    fn scope(&self) -> IsolationContext {
        IsolationContext::for_department(self.tenant_id, self.organization_id, self.id)
    }
}

/// A department and its members
#[derive(Debug, Clone)]
pub struct Department {
    state: DepartmentRecord,
    isolation: IsolationGuard,
    pending_events: Vec<IsolatedEvent<DepartmentEvent>>,
}

impl Department {
    const ENTITY: &'static str = "Department";

    /// Create a department inside `organization_id`
    ///
    /// Needs an organization-level context for that organization.
    pub fn create(
        context: IsolationContext,
        tenant_id: TenantId,
        organization_id: OrganizationId,
        name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let isolation = IsolationGuard::new(context);
        isolation.ensure_level(IsolationLevel::Organization, "createDepartment")?;
        isolation.ensure_same_tenant(tenant_id, Self::ENTITY)?;
        isolation.ensure_same_organization(organization_id, Self::ENTITY)?;

        let name = validate_name(name.into())?;
        let now = Utc::now();
        let mut department = Self {
            state: DepartmentRecord {
                id: DepartmentId::new(),
                tenant_id,
                organization_id,
                name: name.clone(),
                member_ids: Vec::new(),
                version: 1,
                created_at: now,
                updated_at: now,
            },
            isolation,
            pending_events: Vec::new(),
        };
        department.raise(DepartmentEvent::Created {
            organization_id,
            name,
        })?;
        Ok(department)
    }

    /// Load a stored department for an operation running under `context`
    ///
    /// The record must lie inside the context's scope.
    pub fn rehydrate(context: IsolationContext, record: DepartmentRecord) -> Result<Self, DomainError> {
        let isolation = IsolationGuard::new(context);
        isolation.ensure_same_tenant(record.tenant_id, Self::ENTITY)?;
        if context.organization_id().is_some() {
            isolation.ensure_same_organization(record.organization_id, Self::ENTITY)?;
        }
        if context.department_id().is_some() {
            isolation.ensure_same_department(record.id, Self::ENTITY)?;
        }
        Ok(Self {
            state: record,
            isolation,
            pending_events: Vec::new(),
        })
    }

    pub const fn id(&self) -> DepartmentId {
        self.state.id
    }

    pub const fn tenant_id(&self) -> TenantId {
        self.state.tenant_id
    }

    pub const fn organization_id(&self) -> OrganizationId {
        self.state.organization_id
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn member_ids(&self) -> &[UserId] {
        &self.state.member_ids
    }

    pub const fn version(&self) -> u64 {
        self.state.version
    }

    /// Check if a user is a member
    pub fn has_member(&self, user_id: &UserId) -> bool {
        self.state.member_ids.contains(user_id)
    }

    /// Add a user to the department
    ///
    /// Needs a department-level context for this department, and the user
    /// must belong to the department's tenant.
    pub fn assign_member(
        &mut self,
        user_id: UserId,
        user_tenant_id: TenantId,
    ) -> Result<(), DomainError> {
        self.ensure_own_scope("assignMember")?;
        IsolationValidator::require_same_tenant(Some(&self.scope()), user_tenant_id, "User")?;
        if self.has_member(&user_id) {
            return Ok(());
        }

        self.state.member_ids.push(user_id);
        self.touch();
        self.raise(DepartmentEvent::MemberAssigned { user_id })
    }

    /// Remove a user from the department
    pub fn remove_member(&mut self, user_id: UserId) -> Result<(), DomainError> {
        self.ensure_own_scope("removeMember")?;
        let before = self.state.member_ids.len();
        self.state.member_ids.retain(|id| *id != user_id);
        if self.state.member_ids.len() == before {
            return Err(DomainError::not_found("Member", user_id.to_string()));
        }

        self.touch();
        self.raise(DepartmentEvent::MemberRemoved { user_id })
    }

    /// Persistable snapshot of the current state
    pub fn to_record(&self) -> DepartmentRecord {
        self.state.clone()
    }

    /// Events raised since the last call
    pub fn take_pending_events(&mut self) -> Vec<IsolatedEvent<DepartmentEvent>> {
        std::mem::take(&mut self.pending_events)
    }

    fn ensure_own_scope(&self, operation: &str) -> Result<(), DomainError> {
        self.isolation
            .ensure_level(IsolationLevel::Department, operation)?;
        self.isolation
            .ensure_same_tenant(self.state.tenant_id, Self::ENTITY)?;
        self.isolation
            .ensure_same_department(self.state.id, Self::ENTITY)?;
        Ok(())
    }

    fn touch(&mut self) {
        self.state.version += 1;
        self.state.updated_at = Utc::now();
    }

    fn raise(&mut self, payload: DepartmentEvent) -> Result<(), DomainError> {
        self.isolation.publish_event(
            &mut self.pending_events,
            self.state.id.as_uuid(),
            self.state.version,
            |aggregate_id, version, context| {
                IsolatedEvent::new(aggregate_id, version, context, payload)
            },
        )?;
        Ok(())
    }
}

impl IsolationAware for Department {
    fn isolation(&self) -> &IsolationGuard {
        &self.isolation
    }
}

impl IsolationScoped for Department {
    fn scope(&self) -> IsolationContext {
        self.state.scope()
    }
}
