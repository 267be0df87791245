//! Isolation context taken from request headers
//!
//! Reads the tenant, organization, department and user ids from the
//! configured headers of one incoming request. The resulting context is only
//! as trustworthy as whatever set the headers; authenticate upstream.

use application::ports::IsolationContextProvider;
use domain::{DepartmentId, DomainError, IsolationContext, OrganizationId, TenantId, UserId};
use thiserror::Error;
use tracing::warn;

use crate::config::ContextHeaderNames;

/// Why request headers did not yield a context
#[derive(Debug, Error)]
pub enum HeaderContextError {
    /// No scope header was present
    #[error("no isolation headers present")]
    Missing,

    /// A header value is not a valid id
    #[error("header '{header}' is not a valid id: {source}")]
    InvalidId {
        header: String,
        #[source]
        source: uuid::Error,
    },

    /// The same scope header appeared twice with different ids
    #[error("header '{header}' carries conflicting ids")]
    Conflicting { header: String },

    /// The ids do not form a consistent scope
    #[error(transparent)]
    Inconsistent(#[from] DomainError),
}

/// Parse a context from header name/value pairs
///
/// Header names are compared case-insensitively and empty values count as
/// absent. A header repeated with the same id is accepted; repeated with a
/// different id it is rejected. A request carrying no scope header at all is rejected rather than
/// treated as platform-wide.
pub fn parse_context_headers<I, K, V>(
    names: &ContextHeaderNames,
    headers: I,
) -> Result<IsolationContext, HeaderContextError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut tenant = None;
    let mut organization = None;
    let mut department = None;
    let mut user = None;

    for (name, value) in headers {
        let name = name.as_ref();
        let value = value.as_ref().trim();
        if value.is_empty() {
            continue;
        }

        let slot = if name.eq_ignore_ascii_case(&names.tenant) {
            &mut tenant
        } else if name.eq_ignore_ascii_case(&names.organization) {
            &mut organization
        } else if name.eq_ignore_ascii_case(&names.department) {
            &mut department
        } else if name.eq_ignore_ascii_case(&names.user) {
            &mut user
        } else {
            continue;
        };

        let id = uuid::Uuid::parse_str(value).map_err(|source| HeaderContextError::InvalidId {
            header: name.to_string(),
            source,
        })?;
        if slot.is_some_and(|existing| existing != id) {
            return Err(HeaderContextError::Conflicting {
                header: name.to_string(),
            });
        }
        *slot = Some(id);
    }

    if tenant.is_none() && organization.is_none() && department.is_none() && user.is_none() {
        return Err(HeaderContextError::Missing);
    }

    let mut builder = IsolationContext::builder();
    if let Some(id) = tenant {
        builder = builder.tenant(TenantId::from_uuid(id));
    }
    if let Some(id) = organization {
        builder = builder.organization(OrganizationId::from_uuid(id));
    }
    if let Some(id) = department {
        builder = builder.department(DepartmentId::from_uuid(id));
    }
    if let Some(id) = user {
        builder = builder.user(UserId::from_uuid(id));
    }
    Ok(builder.build()?)
}

/// Context provider for a single request
///
/// Resolves the headers once; invalid or missing headers leave the context
/// absent so guarded operations fail with a missing-context error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderContextProvider {
    context: Option<IsolationContext>,
}

impl HeaderContextProvider {
    /// Resolve the context carried by `headers`
    pub fn from_headers<I, K, V>(names: &ContextHeaderNames, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let context = match parse_context_headers(names, headers) {
            Ok(context) => Some(context),
            Err(HeaderContextError::Missing) => None,
            Err(e) => {
                warn!(error = %e, "Rejected isolation headers");
                None
            },
        };
        Self { context }
    }
}

impl IsolationContextProvider for HeaderContextProvider {
    fn current_context(&self) -> Option<IsolationContext> {
        self.context
    }
}
