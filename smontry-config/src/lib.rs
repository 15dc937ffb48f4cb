//! Configuration for the Smontry CLI and client.
//!
//! Configuration is resolved once at startup and then passed by reference. Values are layered in
//! this order, where later sources take precedence:
//!
//!  1. Built-in defaults.
//!  2. The optional `config.yml` file in the config folder.
//!  3. Environment variables (`SENTRY_DSN`, `SENTRY_ENVIRONMENT`).
//!  4. Explicit overrides, such as command line arguments.
//!
//! # Example
//!
//! ```
//! use smontry_config::{Config, OverridableConfig};
//!
//! let mut config = Config::default();
//! config
//!     .apply_override(OverridableConfig {
//!         dsn: Some("https://public@sentry.example.com/42".to_owned()),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! assert_eq!(config.dsn(), Some("https://public@sentry.example.com/42"));
//! ```
#![warn(missing_docs)]

mod config;
mod overrides;

pub use self::config::*;
pub use self::overrides::*;
