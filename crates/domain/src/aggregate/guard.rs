//! Isolation guard embedded in aggregates
//!
//! Aggregates hold an [`IsolationGuard`] fixed at construction and call its
//! `ensure_*` methods before mutating state. The [`IsolationAware`] trait
//! lets an aggregate expose the same checks without a base type.

use uuid::Uuid;

use crate::{
    errors::IsolationError,
    isolation::IsolationValidator,
    value_objects::{DepartmentId, IsolationContext, IsolationLevel, OrganizationId, TenantId, UserId},
};

/// Isolation context of one aggregate instance
///
/// Set once when the aggregate is created or loaded; there is no setter.
/// Re-scoping means building a new aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsolationGuard {
    context: Option<IsolationContext>,
}

impl IsolationGuard {
    /// Guard bound to `context`
    pub const fn new(context: IsolationContext) -> Self {
        Self {
            context: Some(context),
        }
    }

    /// Guard with no context; every `ensure_*` call fails
    pub const fn unscoped() -> Self {
        Self { context: None }
    }

    /// The bound context, if any
    pub const fn context(&self) -> Option<&IsolationContext> {
        self.context.as_ref()
    }

    /// Fail unless a context is bound
    pub fn ensure_context(&self) -> Result<&IsolationContext, IsolationError> {
        IsolationValidator::require_context(self.context())
    }

    /// Fail unless the bound context can act at `required` level
    pub fn ensure_level(
        &self,
        required: IsolationLevel,
        operation: &str,
    ) -> Result<&IsolationContext, IsolationError> {
        IsolationValidator::require_level(self.context(), required, operation)
    }

    /// Fail unless `other` shares this guard's scope
    pub fn ensure_same_scope(&self, other: &Self, entity: &str) -> Result<(), IsolationError> {
        IsolationValidator::require_same_scope(self.context(), other.context(), entity)
    }

    /// Fail unless the bound context belongs to `tenant_id`
    pub fn ensure_same_tenant(
        &self,
        tenant_id: TenantId,
        entity: &str,
    ) -> Result<(), IsolationError> {
        IsolationValidator::require_same_tenant(self.context(), tenant_id, entity)
    }

    /// Fail unless the bound context belongs to `organization_id`
    pub fn ensure_same_organization(
        &self,
        organization_id: OrganizationId,
        entity: &str,
    ) -> Result<(), IsolationError> {
        IsolationValidator::require_same_organization(self.context(), organization_id, entity)
    }

    /// Fail unless the bound context belongs to `department_id`
    pub fn ensure_same_department(
        &self,
        department_id: DepartmentId,
        entity: &str,
    ) -> Result<(), IsolationError> {
        IsolationValidator::require_same_department(self.context(), department_id, entity)
    }

    /// Fail unless the bound context acts for `user_id`
    pub fn ensure_same_user(&self, user_id: UserId, entity: &str) -> Result<(), IsolationError> {
        IsolationValidator::require_same_user(self.context(), user_id, entity)
    }

    /// Check if the bound context sits exactly at `level`
    ///
    /// For display and branching only. Authorization goes through
    /// [`IsolationGuard::ensure_level`].
    pub fn belongs_to_level(&self, level: IsolationLevel) -> bool {
        self.context.is_some_and(|ctx| ctx.level() == level)
    }

    /// Build an event stamped with the bound context and queue it
    ///
    /// `factory` receives the aggregate id, version and context. Nothing is
    /// queued when no context is bound.
    pub fn publish_event<E, F>(
        &self,
        pending: &mut Vec<E>,
        aggregate_id: Uuid,
        version: u64,
        factory: F,
    ) -> Result<(), IsolationError>
    where
        F: FnOnce(Uuid, u64, &IsolationContext) -> E,
    {
        let context = self.ensure_context()?;
        pending.push(factory(aggregate_id, version, context));
        Ok(())
    }
}

impl From<IsolationContext> for IsolationGuard {
    fn from(context: IsolationContext) -> Self {
        Self::new(context)
    }
}

impl From<Option<IsolationContext>> for IsolationGuard {
    fn from(context: Option<IsolationContext>) -> Self {
        Self { context }
    }
}

/// Trait for aggregates that embed an [`IsolationGuard`]
///
/// # Examples
///
/// ```
/// use domain::{IsolationAware, IsolationContext, IsolationGuard, IsolationLevel, TenantId};
///
/// struct Project {
///     isolation: IsolationGuard,
/// }
///
/// impl IsolationAware for Project {
///     fn isolation(&self) -> &IsolationGuard {
///         &self.isolation
///     }
/// }
///
/// let project = Project {
///     isolation: IsolationContext::for_tenant(TenantId::new()).into(),
/// };
/// assert!(project.belongs_to_level(IsolationLevel::Tenant));
/// assert!(project.ensure_level(IsolationLevel::Organization, "archive").is_err());
/// ```
pub trait IsolationAware {
    /// The aggregate's guard
    fn isolation(&self) -> &IsolationGuard;

    /// The aggregate's context, if bound
    fn isolation_context(&self) -> Option<&IsolationContext> {
        self.isolation().context()
    }

    /// Check if the aggregate's context sits exactly at `level`
    fn belongs_to_level(&self, level: IsolationLevel) -> bool {
        self.isolation().belongs_to_level(level)
    }

    /// See [`IsolationGuard::ensure_context`]
    fn ensure_context(&self) -> Result<&IsolationContext, IsolationError> {
        self.isolation().ensure_context()
    }

    /// See [`IsolationGuard::ensure_level`]
    fn ensure_level(
        &self,
        required: IsolationLevel,
        operation: &str,
    ) -> Result<&IsolationContext, IsolationError> {
        self.isolation().ensure_level(required, operation)
    }

    /// See [`IsolationGuard::ensure_same_tenant`]
    fn ensure_same_tenant(&self, tenant_id: TenantId, entity: &str) -> Result<(), IsolationError> {
        self.isolation().ensure_same_tenant(tenant_id, entity)
    }

    /// See [`IsolationGuard::ensure_same_organization`]
    fn ensure_same_organization(
        &self,
        organization_id: OrganizationId,
        entity: &str,
    ) -> Result<(), IsolationError> {
        self.isolation()
            .ensure_same_organization(organization_id, entity)
    }

    /// See [`IsolationGuard::ensure_same_department`]
    fn ensure_same_department(
        &self,
        department_id: DepartmentId,
        entity: &str,
    ) -> Result<(), IsolationError> {
        self.isolation().ensure_same_department(department_id, entity)
    }

    /// See [`IsolationGuard::ensure_same_user`]
    fn ensure_same_user(&self, user_id: UserId, entity: &str) -> Result<(), IsolationError> {
        self.isolation().ensure_same_user(user_id, entity)
    }

    /// Fail unless `other` lives in the same scope as this aggregate
    fn ensure_same_scope_as<O>(&self, other: &O, entity: &str) -> Result<(), IsolationError>
    where
        O: IsolationAware + ?Sized,
    {
        self.isolation().ensure_same_scope(other.isolation(), entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Stamped {
        aggregate_id: Uuid,
        version: u64,
        context: IsolationContext,
    }

    #[test]
    fn unscoped_guard_fails_every_check() {
        let guard = IsolationGuard::unscoped();
        assert_eq!(guard.ensure_context(), Err(IsolationError::MissingContext));
        assert_eq!(
            guard.ensure_level(IsolationLevel::Platform, "x"),
            Err(IsolationError::MissingContext)
        );
        assert_eq!(
            guard.ensure_same_tenant(TenantId::new(), "x"),
            Err(IsolationError::MissingContext)
        );
        assert!(!guard.belongs_to_level(IsolationLevel::Platform));
    }

    #[test]
    fn ensure_level_uses_bound_context() {
        let guard = IsolationGuard::new(IsolationContext::for_tenant(TenantId::new()));
        assert!(guard.ensure_level(IsolationLevel::Tenant, "x").is_ok());
        assert!(matches!(
            guard.ensure_level(IsolationLevel::Organization, "addDepartment"),
            Err(IsolationError::InsufficientLevel { .. })
        ));
    }

    #[test]
    fn belongs_to_level_is_exact() {
        let t = TenantId::new();
        let guard = IsolationGuard::new(IsolationContext::for_organization(t, OrganizationId::new()));
        assert!(guard.belongs_to_level(IsolationLevel::Organization));
        assert!(!guard.belongs_to_level(IsolationLevel::Tenant));
        assert!(!guard.belongs_to_level(IsolationLevel::Department));
    }

    #[test]
    fn ensure_same_ids_against_bound_context() {
        let t = TenantId::new();
        let o = OrganizationId::new();
        let d = DepartmentId::new();
        let u = UserId::new();
        let ctx = IsolationContext::builder()
            .tenant(t)
            .organization(o)
            .department(d)
            .user(u)
            .build()
            .unwrap();
        let guard = IsolationGuard::from(ctx);

        assert!(guard.ensure_same_tenant(t, "Report").is_ok());
        assert!(guard.ensure_same_organization(o, "Report").is_ok());
        assert!(guard.ensure_same_department(d, "Report").is_ok());
        assert!(guard.ensure_same_user(u, "Report").is_ok());
        assert_eq!(
            guard.ensure_same_user(UserId::new(), "Report"),
            Err(IsolationError::CrossScope {
                entity: "Report".to_string(),
                field: crate::value_objects::IsolationField::UserId,
                level: IsolationLevel::User,
            })
        );
    }

    struct Report {
        isolation: IsolationGuard,
    }

    impl IsolationAware for Report {
        fn isolation(&self) -> &IsolationGuard {
            &self.isolation
        }
    }

    #[test]
    fn aware_aggregates_delegate_to_their_guard() {
        let t = TenantId::new();
        let o = OrganizationId::new();
        let d = DepartmentId::new();
        let report = Report {
            isolation: IsolationContext::for_department(t, o, d).into(),
        };

        assert_eq!(report.ensure_context(), Ok(&IsolationContext::for_department(t, o, d)));
        assert!(report.ensure_level(IsolationLevel::Organization, "publish").is_ok());
        assert!(report.ensure_same_tenant(t, "Report").is_ok());
        assert!(report.ensure_same_organization(o, "Report").is_ok());
        assert!(report.ensure_same_department(d, "Report").is_ok());
        assert_eq!(
            report.ensure_same_user(UserId::new(), "Report"),
            Err(IsolationError::cross_scope(
                "Report",
                crate::value_objects::IsolationField::UserId
            ))
        );
        assert_eq!(
            report.ensure_level(IsolationLevel::User, "sign"),
            report.isolation().ensure_level(IsolationLevel::User, "sign")
        );

        let unscoped = Report {
            isolation: IsolationGuard::unscoped(),
        };
        assert_eq!(
            unscoped.ensure_same_tenant(t, "Report"),
            Err(IsolationError::MissingContext)
        );
    }

    #[test]
    fn ensure_same_scope_between_guards() {
        let t = TenantId::new();
        let o = OrganizationId::new();
        let a = IsolationGuard::new(IsolationContext::for_organization(t, o));
        let b = IsolationGuard::new(IsolationContext::for_organization(t, o));
        let c = IsolationGuard::new(IsolationContext::for_organization(t, OrganizationId::new()));

        assert!(a.ensure_same_scope(&b, "Organization").is_ok());
        assert!(matches!(
            a.ensure_same_scope(&c, "Organization"),
            Err(IsolationError::CrossScope { .. })
        ));
        assert_eq!(
            a.ensure_same_scope(&IsolationGuard::unscoped(), "Organization"),
            Err(IsolationError::MissingContext)
        );
    }

    #[test]
    fn publish_event_stamps_context() {
        let ctx = IsolationContext::for_tenant(TenantId::new());
        let guard = IsolationGuard::new(ctx);
        let id = Uuid::new_v4();
        let mut pending = Vec::new();

        guard
            .publish_event(&mut pending, id, 3, |aggregate_id, version, context| Stamped {
                aggregate_id,
                version,
                context: *context,
            })
            .unwrap();

        assert_eq!(
            pending,
            vec![Stamped {
                aggregate_id: id,
                version: 3,
                context: ctx,
            }]
        );
    }

    #[test]
    fn publish_event_without_context_queues_nothing() {
        let guard = IsolationGuard::unscoped();
        let mut pending: Vec<u64> = Vec::new();
        let mut called = false;

        let result = guard.publish_event(&mut pending, Uuid::new_v4(), 1, |_, v, _| {
            called = true;
            v
        });

        assert_eq!(result, Err(IsolationError::MissingContext));
        assert!(pending.is_empty());
        assert!(!called);
    }
}
