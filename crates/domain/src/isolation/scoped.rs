//! Stored records that carry isolation columns

use uuid::Uuid;

use crate::value_objects::{IsolationContext, IsolationField};

/// Trait for records that live inside an isolation scope
///
/// Implement this for anything a repository stores with tenant,
/// organization, department or user columns, so filters can be applied
/// to it.
///
/// # Examples
///
/// ```
/// use domain::{IsolationContext, IsolationScoped, TenantId};
///
/// struct Invoice {
///     tenant_id: TenantId,
/// }
///
/// impl IsolationScoped for Invoice {
///     fn scope(&self) -> IsolationContext {
///         IsolationContext::for_tenant(self.tenant_id)
///     }
/// }
///
/// let tenant_id = TenantId::new();
/// let invoice = Invoice { tenant_id };
/// assert!(invoice.is_within(&IsolationContext::for_tenant(tenant_id)));
/// assert!(!invoice.is_within(&IsolationContext::for_tenant(TenantId::new())));
/// ```
pub trait IsolationScoped {
    /// The scope this record was stored under
    fn scope(&self) -> IsolationContext;

    /// Value of one isolation column
    fn scope_value(&self, field: IsolationField) -> Option<Uuid> {
        self.scope().get(field)
    }

    /// Check if every identifier `context` pins matches this record
    fn is_within(&self, context: &IsolationContext) -> bool {
        IsolationField::ALL.into_iter().all(|field| {
            context
                .get(field)
                .is_none_or(|value| self.scope_value(field) == Some(value))
        })
    }
}

impl IsolationScoped for IsolationContext {
    fn scope(&self) -> IsolationContext {
        *self
    }
}
