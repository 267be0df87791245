//! Tracing subscriber setup
//!
//! Installs a global `tracing` subscriber with an `EnvFilter` and a console
//! formatter. `RUST_LOG` takes precedence over the configured filter.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level filter (e.g., "info", "application=debug,domain=info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit one JSON object per event instead of human-readable lines
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            json: false,
        }
    }
}

/// Handle for the installed subscriber
///
/// Keep it alive for the lifetime of the process.
pub struct TelemetryGuard {
    filter: String,
}

impl TelemetryGuard {
    /// The filter directives in effect
    pub fn filter(&self) -> &str {
        &self.filter
    }
}

impl std::fmt::Debug for TelemetryGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryGuard")
            .field("filter", &self.filter)
            .finish()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        debug!("Telemetry shut down");
    }
}

/// Install the global subscriber
///
/// Fails if the filter directives are invalid or a global subscriber is
/// already installed.
///
/// # Example
///
/// ```ignore
/// use infrastructure::telemetry::{TelemetryConfig, init_telemetry};
///
/// let _guard = init_telemetry(&TelemetryConfig::default())?;
/// ```
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter)
            .map_err(|e| TelemetryError::Filter(e.to_string()))?,
    };
    let filter = env_filter.to_string();

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.json {
        registry
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init()
    }
    .map_err(|e| TelemetryError::Init(e.to_string()))?;

    info!(filter = %filter, json = config.json, "Telemetry initialized");
    Ok(TelemetryGuard { filter })
}

/// Error type for telemetry initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Filter directives could not be parsed
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// Failed to install the tracing subscriber
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}
