//! Isolation validator
//!
//! Pure checks deciding whether a context may perform an operation or
//! reference another scoped entity. Every check takes the context as an
//! `Option` so an absent context always surfaces as
//! [`IsolationError::MissingContext`], whatever the check.

use crate::{
    errors::IsolationError,
    value_objects::{
        DepartmentId, IsolationContext, IsolationField, IsolationLevel, OrganizationId, TenantId,
        UserId,
    },
};

/// Stateless isolation checks
///
/// Safe to call from any number of concurrent operations; holds no state.
///
/// # Examples
///
/// ```
/// use domain::{IsolationContext, IsolationError, IsolationLevel, IsolationValidator, TenantId};
///
/// let ctx = IsolationContext::for_tenant(TenantId::new());
///
/// assert!(IsolationValidator::require_level(Some(&ctx), IsolationLevel::Tenant, "listOrgs").is_ok());
/// assert!(matches!(
///     IsolationValidator::require_level(Some(&ctx), IsolationLevel::Organization, "addDepartment"),
///     Err(IsolationError::InsufficientLevel { .. })
/// ));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IsolationValidator;

impl IsolationValidator {
    /// Fail unless a context is present
    pub fn require_context(
        context: Option<&IsolationContext>,
    ) -> Result<&IsolationContext, IsolationError> {
        context.ok_or(IsolationError::MissingContext)
    }

    /// Fail unless the context can act at `required` level
    ///
    /// Platform contexts always pass. Any other context passes when it
    /// carries the identifiers `required` is scoped by, so a tenant context
    /// cannot run an organization-level operation but an organization
    /// context can run a tenant-level one.
    pub fn require_level<'a>(
        context: Option<&'a IsolationContext>,
        required: IsolationLevel,
        operation: &str,
    ) -> Result<&'a IsolationContext, IsolationError> {
        let context = Self::require_context(context)?;
        if context.is_platform() || context.has_scope_for(required) {
            return Ok(context);
        }
        Err(IsolationError::insufficient_level(
            context.level(),
            required,
            operation,
        ))
    }

    /// Fail unless both contexts agree at the broader of their two levels
    ///
    /// Fields are compared from tenant down, and the first mismatch is
    /// reported. The relation is symmetric.
    pub fn require_same_scope(
        context: Option<&IsolationContext>,
        other: Option<&IsolationContext>,
        entity: &str,
    ) -> Result<(), IsolationError> {
        let context = Self::require_context(context)?;
        let other = Self::require_context(other)?;
        let level = context.level().broadest(other.level());

        IsolationField::ALL
            .into_iter()
            .filter(|field| !field.level().is_narrower_than(level))
            .find(|field| context.get(*field) != other.get(*field))
            .map_or(Ok(()), |field| {
                Err(IsolationError::cross_scope(entity, field))
            })
    }

    /// Fail unless the context belongs to `tenant_id`
    pub fn require_same_tenant(
        context: Option<&IsolationContext>,
        tenant_id: TenantId,
        entity: &str,
    ) -> Result<(), IsolationError> {
        let context = Self::require_context(context)?;
        Self::require_field(
            context,
            IsolationField::TenantId,
            context.tenant_id() == Some(tenant_id),
            entity,
        )
    }

    /// Fail unless the context belongs to `organization_id`
    pub fn require_same_organization(
        context: Option<&IsolationContext>,
        organization_id: OrganizationId,
        entity: &str,
    ) -> Result<(), IsolationError> {
        let context = Self::require_context(context)?;
        Self::require_field(
            context,
            IsolationField::OrganizationId,
            context.organization_id() == Some(organization_id),
            entity,
        )
    }

    /// Fail unless the context belongs to `department_id`
    pub fn require_same_department(
        context: Option<&IsolationContext>,
        department_id: DepartmentId,
        entity: &str,
    ) -> Result<(), IsolationError> {
        let context = Self::require_context(context)?;
        Self::require_field(
            context,
            IsolationField::DepartmentId,
            context.department_id() == Some(department_id),
            entity,
        )
    }

    /// Fail unless the context acts for `user_id`
    pub fn require_same_user(
        context: Option<&IsolationContext>,
        user_id: UserId,
        entity: &str,
    ) -> Result<(), IsolationError> {
        let context = Self::require_context(context)?;
        Self::require_field(
            context,
            IsolationField::UserId,
            context.user_id() == Some(user_id),
            entity,
        )
    }

    // Platform contexts reference anything, matching require_same_scope.
    fn require_field(
        context: &IsolationContext,
        field: IsolationField,
        matches: bool,
        entity: &str,
    ) -> Result<(), IsolationError> {
        if matches || context.is_platform() {
            Ok(())
        } else {
            Err(IsolationError::cross_scope(entity, field))
        }
    }
}
