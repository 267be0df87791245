//! Department Service - Scoped use cases over departments

use std::sync::Arc;

use domain::{
    Department, DepartmentEvent, DepartmentId, DepartmentRecord, IsolatedEvent, IsolationContext,
    IsolationFilterBuilder, IsolationLevel, OrganizationId, TenantId, UserId,
};
use tracing::{debug, info, instrument};

use super::IsolationEnforcer;
use crate::{error::ApplicationError, ports::DepartmentRepository};

/// Result of a department command
#[derive(Debug, Clone)]
pub struct DepartmentChange {
    /// State after the change
    pub record: DepartmentRecord,
    /// Events raised by the change, stamped with the caller's context
    pub events: Vec<IsolatedEvent<DepartmentEvent>>,
}

/// Service for department use cases
///
/// Every method declares the level it needs; the enforcer rejects callers
/// below it before any repository call is made.
pub struct DepartmentService {
    enforcer: IsolationEnforcer,
    filters: IsolationFilterBuilder,
    repository: Arc<dyn DepartmentRepository>,
}

impl std::fmt::Debug for DepartmentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DepartmentService")
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

impl DepartmentService {
    /// Create a new department service
    pub fn new(
        enforcer: IsolationEnforcer,
        filters: IsolationFilterBuilder,
        repository: Arc<dyn DepartmentRepository>,
    ) -> Self {
        Self {
            enforcer,
            filters,
            repository,
        }
    }

    /// List the departments visible to the caller
    #[instrument(skip(self))]
    pub async fn list_departments(&self) -> Result<Vec<DepartmentRecord>, ApplicationError> {
        self.enforcer
            .run_async(IsolationLevel::Tenant, "listDepartments", |ctx| async move {
                let filter = self.filters.build_filter(Some(&ctx), visible_level(&ctx))?;
                let departments = self.repository.find(&filter).await?;
                debug!(count = departments.len(), "Listed departments");
                Ok(departments)
            })
            .await
    }

    /// Get one department visible to the caller
    #[instrument(skip(self), fields(department_id = %id))]
    pub async fn get_department(
        &self,
        id: DepartmentId,
    ) -> Result<DepartmentRecord, ApplicationError> {
        self.enforcer
            .run_async(IsolationLevel::Tenant, "getDepartment", |ctx| async move {
                let filter = self.filters.build_filter(Some(&ctx), visible_level(&ctx))?;
                self.repository
                    .get(&id, &filter)
                    .await?
                    .ok_or_else(|| ApplicationError::NotFound(format!("Department {id}")))
            })
            .await
    }

    /// Create a department inside an organization
    #[instrument(skip(self, name), fields(organization_id = %organization_id))]
    pub async fn create_department(
        &self,
        tenant_id: TenantId,
        organization_id: OrganizationId,
        name: String,
    ) -> Result<DepartmentChange, ApplicationError> {
        self.enforcer
            .run_async(IsolationLevel::Organization, "createDepartment", |ctx| async move {
                let mut department = Department::create(ctx, tenant_id, organization_id, name)?;
                let record = department.to_record();
                self.repository.save(&record).await?;

                info!(department_id = %record.id, "Department created");
                Ok(DepartmentChange {
                    record,
                    events: department.take_pending_events(),
                })
            })
            .await
    }

    /// Add a user of the department's tenant to the department
    #[instrument(skip(self), fields(department_id = %department_id, user_id = %user_id))]
    pub async fn assign_member(
        &self,
        department_id: DepartmentId,
        user_id: UserId,
        user_tenant_id: TenantId,
    ) -> Result<DepartmentChange, ApplicationError> {
        self.enforcer
            .run_async(IsolationLevel::Department, "assignMember", |ctx| async move {
                let filter = self.filters.build_filter(Some(&ctx), IsolationLevel::Department)?;
                let record = self
                    .repository
                    .get(&department_id, &filter)
                    .await?
                    .ok_or_else(|| {
                        ApplicationError::NotFound(format!("Department {department_id}"))
                    })?;

                let mut department = Department::rehydrate(ctx, record)?;
                department.assign_member(user_id, user_tenant_id)?;
                let record = department.to_record();
                let events = department.take_pending_events();
                if events.is_empty() {
                    debug!("User already a member");
                } else {
                    self.repository.save(&record).await?;
                    info!(version = record.version, "Member assigned");
                }
                Ok(DepartmentChange { record, events })
            })
            .await
    }
}

/// Most specific department-relevant level the context is scoped for
fn visible_level(context: &IsolationContext) -> IsolationLevel {
    [
        IsolationLevel::Department,
        IsolationLevel::Organization,
        IsolationLevel::Tenant,
    ]
    .into_iter()
    .find(|level| context.has_scope_for(*level))
    .unwrap_or(IsolationLevel::Platform)
}
