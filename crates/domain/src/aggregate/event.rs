//! Domain events stamped with their originating scope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::{IsolationContext, IsolationLevel};

/// Envelope for a domain event raised by an isolated aggregate
///
/// Consumers rebuild "who could see this" from `context`; an event cannot
/// be created without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolatedEvent<P> {
    /// Unique, time-ordered event id
    pub event_id: Uuid,
    /// Aggregate that raised the event
    pub aggregate_id: Uuid,
    /// Aggregate version after the change
    pub aggregate_version: u64,
    /// Scope the change was made in
    pub context: IsolationContext,
    /// When the event was raised
    pub occurred_at: DateTime<Utc>,
    /// Event-specific data
    pub payload: P,
}

impl<P> IsolatedEvent<P> {
    /// Stamp `payload` with aggregate id, version and context
    pub fn new(
        aggregate_id: Uuid,
        aggregate_version: u64,
        context: &IsolationContext,
        payload: P,
    ) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            aggregate_id,
            aggregate_version,
            context: *context,
            occurred_at: Utc::now(),
            payload,
        }
    }

    /// Level of the context the event was raised in
    pub const fn level(&self) -> IsolationLevel {
        self.context.level()
    }
}
