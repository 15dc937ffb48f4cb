//! Smontry is a minimal command line client for Sentry.
//!
//! It submits single message events to a Sentry store endpoint, which is derived from a DSN. This
//! is useful to verify a DSN from a shell or to report one-off events from scripts.
//!
//! # Usage
//!
//! ```text
//! SENTRY_DSN=https://<key>@o1.ingest.sentry.io/42 smontry send "backup finished"
//! smontry send --level error --environment staging "backup failed"
//! smontry dsn https://<key>@o1.ingest.sentry.io/42
//! ```
//!
//! Without a message, `smontry send` submits a test message with a random identifier.
//!
//! # Workspace Crates
//!
//!  - `smontry`: Main entry point and command line interface.
//!  - [`smontry-client`]: DSN parsing, event augmentation and submission.
//!  - [`smontry-config`]: Static configuration for the CLI and client.
//!  - [`smontry-log`]: Logging facade and setup.
//!
//! [`smontry-client`]: ../smontry_client/index.html
//! [`smontry-config`]: ../smontry_config/index.html
//! [`smontry-log`]: ../smontry_log/index.html

mod cli;
mod cliapp;
mod setup;

use std::process;

pub fn main() {
    let exit_code = match cli::execute() {
        Ok(()) => 0,
        Err(err) => {
            smontry_log::ensure_error(&err);
            1
        }
    };

    process::exit(exit_code);
}
