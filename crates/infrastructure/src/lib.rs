//! Infrastructure layer - Adapters, configuration and logging
//!
//! Implements the ports defined in the application layer and wires the
//! isolation services from configuration.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;

use std::sync::Arc;

use application::{
    ports::{DepartmentRepository, IsolationContextProvider},
    services::{DepartmentService, IsolationEnforcer},
};

pub use adapters::*;
pub use config::{AppConfig, ContextHeaderNames, Environment, IsolationAppConfig};
pub use persistence::InMemoryDepartmentRepository;
pub use telemetry::{TelemetryConfig, TelemetryError, TelemetryGuard, init_telemetry};

/// Build a department service from configuration
///
/// Filters follow `config.isolation.department_filter`; contexts come from
/// `provider`.
pub fn department_service(
    config: &AppConfig,
    provider: Arc<dyn IsolationContextProvider>,
    repository: Arc<dyn DepartmentRepository>,
) -> DepartmentService {
    DepartmentService::new(
        IsolationEnforcer::new(provider),
        config.isolation.filter_builder(),
        repository,
    )
}
