//! Overrides for the configuration from environment variables and command line arguments.

use std::env;

/// Environment variable holding the default DSN.
pub const DSN_ENV: &str = "SENTRY_DSN";

/// Environment variable holding the default environment tag.
pub const ENVIRONMENT_ENV: &str = "SENTRY_ENVIRONMENT";

/// Configuration values that can be overridden after loading the config file.
///
/// All fields are optional. `None` leaves the loaded value unchanged.
#[derive(Clone, Debug, Default)]
pub struct OverridableConfig {
    /// The default DSN.
    pub dsn: Option<String>,
    /// The default environment tag.
    pub environment: Option<String>,
    /// The request timeout in seconds.
    pub timeout: Option<u64>,
    /// The log level, for example `debug`.
    pub log_level: Option<String>,
    /// The log format, for example `json`.
    pub log_format: Option<String>,
}

impl OverridableConfig {
    /// Extract config arguments from environment variables.
    ///
    /// The environment is read when this is called and not cached.
    pub fn from_env() -> Self {
        OverridableConfig {
            dsn: env::var(DSN_ENV).ok(),
            environment: env::var(ENVIRONMENT_ENV).ok(),
            ..Default::default()
        }
    }
}
