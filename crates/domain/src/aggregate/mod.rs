//! Aggregate support for isolation
//!
//! Composition instead of a base type: an aggregate embeds an
//! [`IsolationGuard`], implements [`IsolationAware`], and queues
//! [`IsolatedEvent`]s through [`IsolationGuard::publish_event`].

mod event;
mod guard;

pub use event::IsolatedEvent;
pub use guard::{IsolationAware, IsolationGuard};
