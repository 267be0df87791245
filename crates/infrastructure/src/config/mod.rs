//! Application configuration
//!
//! Loaded from built-in defaults, an optional `config.toml` and
//! `TENANT_ISOLATION_*` environment variables, in that order of precedence.

mod isolation;

use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

pub use isolation::{ContextHeaderNames, IsolationAppConfig};

use crate::telemetry::TelemetryConfig;

/// Prefix of environment variables overriding file settings
///
/// Nested keys are separated by a double underscore, e.g.
/// `TENANT_ISOLATION_ISOLATION__DEPARTMENT_FILTER=full_chain`.
pub const ENV_PREFIX: &str = "TENANT_ISOLATION";

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development and tests
    #[default]
    Development,
    /// Deployed service
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!("unknown environment '{s}'")),
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment
    #[serde(default)]
    pub environment: Environment,

    /// Isolation enforcement settings
    #[serde(default)]
    pub isolation: IsolationAppConfig,

    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(
            config::File::with_name("config").required(false),
            Self::environment_source(),
        )
    }

    /// Load configuration from an explicit file, still honouring the environment
    ///
    /// The file must exist; its format is inferred from the extension.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        Self::build(
            config::File::from(path.as_ref()).required(true),
            Self::environment_source(),
        )
    }

    /// Like [`AppConfig::load_from`], reading `vars` instead of the process environment
    ///
    /// `vars` uses the same `TENANT_ISOLATION_*` names.
    pub fn load_from_with_vars(
        path: impl AsRef<Path>,
        vars: config::Map<String, String>,
    ) -> Result<Self, config::ConfigError> {
        Self::build(
            config::File::from(path.as_ref()).required(true),
            Self::environment_source().source(Some(vars)),
        )
    }

    fn environment_source() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn build<S>(file: S, environment: config::Environment) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .set_default("environment", "development")?
            .set_default("isolation.department_filter", "tenant_and_department")?
            .set_default("telemetry.log_filter", "info")?
            .add_source(file)
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    /// Whether the production environment is configured
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}
