//! A minimal client for submitting events to Sentry.
//!
//! The client derives the store endpoint and the authentication header from a single DSN,
//! augments the event with standard fields, and sends it as gzip-compressed JSON. Every call sends
//! one event and returns the raw response body. There is no queueing, batching or retrying:
//! transport errors are returned to the caller.
//!
//! # Sending Messages
//!
//! ```no_run
//! use smontry_client::{Client, Level};
//! use smontry_config::Config;
//!
//! # async fn run() -> Result<(), smontry_client::Error> {
//! let config = Config::from_env()?;
//! let client = Client::new(&config)?;
//!
//! let response = client.capture_message("disk almost full", Level::Warning, None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! For one-off messages, [`capture_message`] resolves the configuration from the environment on
//! every call.
//!
//! # Wire Format
//!
//! Events are posted to `{scheme}://{host}{path}api/{project_id}/store/` with these headers:
//!
//!  - `Content-Encoding: gzip`
//!  - `Content-Type: application/json`
//!  - `User-Agent: smontry/<version>`
//!  - `X-Sentry-Auth: Sentry sentry_key=..., sentry_version=7, ...`
#![warn(missing_docs)]

mod auth;
mod client;
mod constants;
mod dsn;
mod error;
mod event;
mod http;

pub use self::auth::*;
pub use self::client::*;
pub use self::constants::*;
pub use self::dsn::*;
pub use self::error::*;
pub use self::event::*;
pub use self::http::{AUTH_HEADER, HttpError, StatusCode, encode_gzip};
