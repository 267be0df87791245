//! Isolation context carried through every scoped operation
//!
//! An [`IsolationContext`] bundles the tenant, organization, department and
//! user an operation acts for. It is built once per inbound operation, never
//! mutated, and passed explicitly down the call chain.
//!
//! # Examples
//!
//! ```
//! use domain::{IsolationContext, IsolationLevel, OrganizationId, TenantId};
//!
//! let platform = IsolationContext::platform();
//! assert_eq!(platform.level(), IsolationLevel::Platform);
//!
//! let org = IsolationContext::for_organization(TenantId::new(), OrganizationId::new());
//! assert_eq!(org.level(), IsolationLevel::Organization);
//! assert!(org.has_scope_for(IsolationLevel::Tenant));
//! assert!(!org.has_scope_for(IsolationLevel::Department));
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DepartmentId, IsolationField, IsolationLevel, OrganizationId, TenantId, UserId};
use crate::errors::DomainError;

/// Immutable scope of one inbound operation
///
/// Levels are cumulative: an organization needs its tenant, a department
/// needs its tenant and organization, and a user needs its tenant. Every
/// constructor enforces this, including deserialization.
///
/// # Thread Safety
///
/// `IsolationContext` is `Send + Sync` and can be read concurrently by
/// any number of operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawIsolationContext")]
pub struct IsolationContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    tenant_id: Option<TenantId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    organization_id: Option<OrganizationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    department_id: Option<DepartmentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<UserId>,
}

impl IsolationContext {
    /// Unscoped context for platform operators
    pub const fn platform() -> Self {
        Self {
            tenant_id: None,
            organization_id: None,
            department_id: None,
            user_id: None,
        }
    }

    /// Context scoped to a tenant
    pub const fn for_tenant(tenant_id: TenantId) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            ..Self::platform()
        }
    }

    /// Context scoped to an organization
    pub const fn for_organization(tenant_id: TenantId, organization_id: OrganizationId) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            organization_id: Some(organization_id),
            ..Self::platform()
        }
    }

    /// Context scoped to a department
    pub const fn for_department(
        tenant_id: TenantId,
        organization_id: OrganizationId,
        department_id: DepartmentId,
    ) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            organization_id: Some(organization_id),
            department_id: Some(department_id),
            user_id: None,
        }
    }

    /// Context scoped to a user who belongs directly to a tenant
    ///
    /// Use [`IsolationContext::builder`] when the user's organization and
    /// department are known as well.
    pub const fn for_user(tenant_id: TenantId, user_id: UserId) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            user_id: Some(user_id),
            ..Self::platform()
        }
    }

    /// Start building a context field by field
    ///
    /// # Examples
    ///
    /// ```
    /// use domain::{IsolationContext, IsolationLevel, OrganizationId, TenantId, UserId};
    ///
    /// let ctx = IsolationContext::builder()
    ///     .tenant(TenantId::new())
    ///     .organization(OrganizationId::new())
    ///     .user(UserId::new())
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(ctx.level(), IsolationLevel::User);
    ///
    /// // A user without a tenant is rejected
    /// assert!(IsolationContext::builder().user(UserId::new()).build().is_err());
    /// ```
    pub fn builder() -> IsolationContextBuilder {
        IsolationContextBuilder::default()
    }

    /// Tenant this context is scoped to
    pub const fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    /// Organization this context is scoped to
    pub const fn organization_id(&self) -> Option<OrganizationId> {
        self.organization_id
    }

    /// Department this context is scoped to
    pub const fn department_id(&self) -> Option<DepartmentId> {
        self.department_id
    }

    /// User this context acts for
    pub const fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Read one scoped field as a raw UUID
    pub fn get(&self, field: IsolationField) -> Option<Uuid> {
        match field {
            IsolationField::TenantId => self.tenant_id.map(Uuid::from),
            IsolationField::OrganizationId => self.organization_id.map(Uuid::from),
            IsolationField::DepartmentId => self.department_id.map(Uuid::from),
            IsolationField::UserId => self.user_id.map(Uuid::from),
        }
    }

    /// The most specific level whose identifier is present
    pub const fn level(&self) -> IsolationLevel {
        if self.user_id.is_some() {
            IsolationLevel::User
        } else if self.department_id.is_some() {
            IsolationLevel::Department
        } else if self.organization_id.is_some() {
            IsolationLevel::Organization
        } else if self.tenant_id.is_some() {
            IsolationLevel::Tenant
        } else {
            IsolationLevel::Platform
        }
    }

    /// Check if this is an unscoped platform context
    pub const fn is_platform(&self) -> bool {
        matches!(self.level(), IsolationLevel::Platform)
    }

    /// Check if this context carries every identifier `level` is scoped by
    ///
    /// A platform requirement needs nothing. Any other level needs the
    /// tenant plus the level's own identifier; the cumulative invariant
    /// supplies the organization for departments.
    pub fn has_scope_for(&self, level: IsolationLevel) -> bool {
        match level {
            IsolationLevel::Platform => true,
            IsolationLevel::Tenant => self.tenant_id.is_some(),
            IsolationLevel::Organization => {
                self.tenant_id.is_some() && self.organization_id.is_some()
            },
            IsolationLevel::Department => {
                self.tenant_id.is_some() && self.department_id.is_some()
            },
            IsolationLevel::User => self.tenant_id.is_some() && self.user_id.is_some(),
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.tenant_id.is_none()
            && (self.organization_id.is_some()
                || self.department_id.is_some()
                || self.user_id.is_some())
        {
            return Err(DomainError::ValidationError(
                "isolation context without tenant cannot name an organization, department or user"
                    .to_string(),
            ));
        }
        if self.department_id.is_some() && self.organization_id.is_none() {
            return Err(DomainError::ValidationError(
                "department-scoped isolation context requires an organization".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`IsolationContext`] that checks the cumulative invariant
#[derive(Debug, Clone, Copy, Default)]
pub struct IsolationContextBuilder {
    inner: IsolationContext,
}

impl IsolationContextBuilder {
    /// Set the tenant
    #[must_use]
    pub const fn tenant(mut self, tenant_id: TenantId) -> Self {
        self.inner.tenant_id = Some(tenant_id);
        self
    }

    /// Set the organization
    #[must_use]
    pub const fn organization(mut self, organization_id: OrganizationId) -> Self {
        self.inner.organization_id = Some(organization_id);
        self
    }

    /// Set the department
    #[must_use]
    pub const fn department(mut self, department_id: DepartmentId) -> Self {
        self.inner.department_id = Some(department_id);
        self
    }

    /// Set the user
    #[must_use]
    pub const fn user(mut self, user_id: UserId) -> Self {
        self.inner.user_id = Some(user_id);
        self
    }

    /// Validate and produce the context
    pub fn build(self) -> Result<IsolationContext, DomainError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIsolationContext {
    #[serde(default)]
    tenant_id: Option<TenantId>,
    #[serde(default)]
    organization_id: Option<OrganizationId>,
    #[serde(default)]
    department_id: Option<DepartmentId>,
    #[serde(default)]
    user_id: Option<UserId>,
}

impl TryFrom<RawIsolationContext> for IsolationContext {
    type Error = DomainError;

    fn try_from(raw: RawIsolationContext) -> Result<Self, Self::Error> {
        let ctx = Self {
            tenant_id: raw.tenant_id,
            organization_id: raw.organization_id,
            department_id: raw.department_id,
            user_id: raw.user_id,
        };
        ctx.validate()?;
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_is_platform() {
        let ctx = IsolationContext::platform();
        assert_eq!(ctx.level(), IsolationLevel::Platform);
        assert!(ctx.is_platform());
        assert_eq!(ctx, IsolationContext::default());
    }

    #[test]
    fn level_is_most_specific_present_id() {
        let t = TenantId::new();
        let o = OrganizationId::new();
        let d = DepartmentId::new();
        let u = UserId::new();

        assert_eq!(IsolationContext::for_tenant(t).level(), IsolationLevel::Tenant);
        assert_eq!(
            IsolationContext::for_organization(t, o).level(),
            IsolationLevel::Organization
        );
        assert_eq!(
            IsolationContext::for_department(t, o, d).level(),
            IsolationLevel::Department
        );
        assert_eq!(IsolationContext::for_user(t, u).level(), IsolationLevel::User);
    }

    #[test]
    fn builder_accepts_full_chain() {
        let ctx = IsolationContext::builder()
            .tenant(TenantId::new())
            .organization(OrganizationId::new())
            .department(DepartmentId::new())
            .user(UserId::new())
            .build()
            .unwrap();
        assert_eq!(ctx.level(), IsolationLevel::User);
        assert!(ctx.has_scope_for(IsolationLevel::Department));
    }

    #[test]
    fn builder_rejects_department_without_organization() {
        let result = IsolationContext::builder()
            .tenant(TenantId::new())
            .department(DepartmentId::new())
            .build();
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn builder_rejects_organization_without_tenant() {
        let result = IsolationContext::builder()
            .organization(OrganizationId::new())
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn user_without_department_has_no_department_scope() {
        let ctx = IsolationContext::for_user(TenantId::new(), UserId::new());
        assert!(ctx.has_scope_for(IsolationLevel::Tenant));
        assert!(ctx.has_scope_for(IsolationLevel::User));
        assert!(!ctx.has_scope_for(IsolationLevel::Organization));
        assert!(!ctx.has_scope_for(IsolationLevel::Department));
    }

    #[test]
    fn get_reads_raw_values() {
        let t = TenantId::new();
        let o = OrganizationId::new();
        let ctx = IsolationContext::for_organization(t, o);
        assert_eq!(ctx.get(IsolationField::TenantId), Some(t.as_uuid()));
        assert_eq!(ctx.get(IsolationField::OrganizationId), Some(o.as_uuid()));
        assert_eq!(ctx.get(IsolationField::DepartmentId), None);
        assert_eq!(ctx.get(IsolationField::UserId), None);
    }

    #[test]
    fn equality_is_structural() {
        let t = TenantId::new();
        let o = OrganizationId::new();
        assert_eq!(
            IsolationContext::for_organization(t, o),
            IsolationContext::for_organization(t, o)
        );
        assert_ne!(
            IsolationContext::for_organization(t, o),
            IsolationContext::for_organization(t, OrganizationId::new())
        );
    }

    #[test]
    fn serializes_camel_case_and_skips_absent() {
        let t = TenantId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let json = serde_json::to_string(&IsolationContext::for_tenant(t)).unwrap();
        assert_eq!(json, r#"{"tenantId":"550e8400-e29b-41d4-a716-446655440000"}"#);
    }

    #[test]
    fn deserialization_enforces_invariant() {
        let ok: IsolationContext =
            serde_json::from_str(r#"{"tenantId":"550e8400-e29b-41d4-a716-446655440000"}"#)
                .unwrap();
        assert_eq!(ok.level(), IsolationLevel::Tenant);

        let bad = serde_json::from_str::<IsolationContext>(
            r#"{"userId":"550e8400-e29b-41d4-a716-446655440000"}"#,
        );
        assert!(bad.is_err());

        let empty: IsolationContext = serde_json::from_str("{}").unwrap();
        assert!(empty.is_platform());
    }

    #[test]
    fn test_context_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IsolationContext>();
    }
}
