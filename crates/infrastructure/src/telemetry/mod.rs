//! Logging infrastructure
//!
//! Structured `tracing` output to the console, plain or JSON.

mod subscriber;

pub use subscriber::{TelemetryConfig, TelemetryError, TelemetryGuard, init_telemetry};
