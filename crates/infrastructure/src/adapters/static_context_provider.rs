//! Fixed isolation context, for batch jobs and tests

use application::ports::IsolationContextProvider;
use domain::IsolationContext;

/// Context provider returning the same context on every call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticContextProvider {
    context: Option<IsolationContext>,
}

impl StaticContextProvider {
    /// Provider for `context`
    pub const fn new(context: IsolationContext) -> Self {
        Self {
            context: Some(context),
        }
    }

    /// Provider for maintenance jobs spanning all tenants
    pub const fn platform() -> Self {
        Self::new(IsolationContext::platform())
    }

    /// Provider that never yields a context
    pub const fn absent() -> Self {
        Self { context: None }
    }
}

impl From<Option<IsolationContext>> for StaticContextProvider {
    fn from(context: Option<IsolationContext>) -> Self {
        Self { context }
    }
}

impl IsolationContextProvider for StaticContextProvider {
    fn current_context(&self) -> Option<IsolationContext> {
        self.context
    }
}
