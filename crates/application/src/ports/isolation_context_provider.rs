//! Port for obtaining the current operation's isolation context

#[cfg(test)]
use mockall::automock;

use domain::IsolationContext;

/// Supplies the isolation context of the operation in progress
///
/// Implemented by whatever establishes the caller's scope (request
/// middleware, job runner, test fixture). Called once per guarded
/// operation; `None` means no context could be established.
#[cfg_attr(test, automock)]
pub trait IsolationContextProvider: Send + Sync {
    /// The current context, if one was established
    fn current_context(&self) -> Option<IsolationContext>;
}
