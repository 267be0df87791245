//! Isolation enforcement around use cases and repository calls
//!
//! Wrappers that validate the caller's context against a declared level
//! before running an operation. The wrapped operation never runs when the
//! check fails, and the typed error reaches the caller unchanged.

use std::{future::Future, sync::Arc};

use domain::{IsolationContext, IsolationError, IsolationLevel, IsolationValidator};
use tracing::{debug, warn};

use crate::ports::IsolationContextProvider;

/// Run `operation` only if `context` can act at `level`
///
/// The validated context is handed to the operation, which derives its
/// own filters or relies on aggregate guards.
///
/// # Examples
///
/// ```
/// use application::guarded;
/// use domain::{IsolationContext, IsolationError, IsolationLevel, TenantId};
///
/// let ctx = IsolationContext::for_tenant(TenantId::new());
///
/// let ok: Result<u32, IsolationError> =
///     guarded(Some(&ctx), IsolationLevel::Tenant, "count", |_| Ok(3));
/// assert_eq!(ok, Ok(3));
///
/// let denied: Result<u32, IsolationError> =
///     guarded(Some(&ctx), IsolationLevel::Organization, "count", |_| Ok(3));
/// assert!(denied.is_err());
/// ```
pub fn guarded<T, E, F>(
    context: Option<&IsolationContext>,
    level: IsolationLevel,
    operation_label: &str,
    operation: F,
) -> Result<T, E>
where
    F: FnOnce(&IsolationContext) -> Result<T, E>,
    E: From<IsolationError>,
{
    let context = check(context, level, operation_label)?;
    operation(context)
}

/// Wrap `operation` into a guarded operation that takes the context later
///
/// # Examples
///
/// ```
/// use application::guard;
/// use domain::{IsolationContext, IsolationError, IsolationLevel};
///
/// let op = guard(IsolationLevel::Tenant, "purge", |_| Ok::<_, IsolationError>("done"));
/// assert_eq!(op(None), Err(IsolationError::MissingContext));
/// ```
pub fn guard<T, E, F>(
    level: IsolationLevel,
    operation_label: &'static str,
    operation: F,
) -> impl FnOnce(Option<&IsolationContext>) -> Result<T, E>
where
    F: FnOnce(&IsolationContext) -> Result<T, E>,
    E: From<IsolationError>,
{
    move |context: Option<&IsolationContext>| guarded(context, level, operation_label, operation)
}

fn check<'a>(
    context: Option<&'a IsolationContext>,
    level: IsolationLevel,
    operation_label: &str,
) -> Result<&'a IsolationContext, IsolationError> {
    match IsolationValidator::require_level(context, level, operation_label) {
        Ok(context) => {
            debug!(
                operation = operation_label,
                required = %level,
                current = %context.level(),
                "Isolation check passed"
            );
            Ok(context)
        },
        Err(e) => {
            warn!(
                operation = operation_label,
                required = %level,
                error = %e,
                "Isolation check rejected operation"
            );
            Err(e)
        },
    }
}

/// Enforces isolation using the context of the operation in progress
///
/// Obtains the context from an [`IsolationContextProvider`] once per call
/// and then behaves exactly like [`guarded`].
#[derive(Clone)]
pub struct IsolationEnforcer {
    provider: Arc<dyn IsolationContextProvider>,
}

impl std::fmt::Debug for IsolationEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IsolationEnforcer").finish_non_exhaustive()
    }
}

impl IsolationEnforcer {
    /// Create an enforcer reading contexts from `provider`
    pub fn new(provider: Arc<dyn IsolationContextProvider>) -> Self {
        Self { provider }
    }

    /// Context of the operation in progress
    pub fn current_context(&self) -> Option<IsolationContext> {
        self.provider.current_context()
    }

    /// Run a synchronous operation behind the isolation check
    pub fn run<T, E, F>(
        &self,
        level: IsolationLevel,
        operation_label: &str,
        operation: F,
    ) -> Result<T, E>
    where
        F: FnOnce(&IsolationContext) -> Result<T, E>,
        E: From<IsolationError>,
    {
        let context = self.current_context();
        guarded(context.as_ref(), level, operation_label, operation)
    }

    /// Run an asynchronous operation behind the isolation check
    ///
    /// The future is not created when the check fails.
    pub async fn run_async<T, E, F, Fut>(
        &self,
        level: IsolationLevel,
        operation_label: &str,
        operation: F,
    ) -> Result<T, E>
    where
        F: FnOnce(IsolationContext) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<IsolationError>,
    {
        let context = self.current_context();
        let context = *check(context.as_ref(), level, operation_label)?;
        operation(context).await
    }
}
