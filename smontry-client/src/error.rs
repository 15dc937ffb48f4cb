use std::io;

use smontry_config::ConfigError;

use crate::dsn::ParseDsnError;
use crate::http::HttpError;

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// No usable DSN or an invalid configuration.
    Configuration,
    /// The DSN is present but malformed.
    InvalidDsn,
    /// The request failed or the server rejected it.
    Transport,
    /// The event could not be encoded for the wire.
    Serialization,
}

/// An error returned when submitting an event.
///
/// None of these errors are handled inside the client. A failed submission is not retried, and
/// the event is lost unless the caller keeps it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither an explicit nor a default DSN is available.
    #[error("no sentry DSN configured")]
    MissingDsn,

    /// The configuration could not be resolved.
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    /// The DSN could not be parsed.
    #[error("invalid sentry DSN")]
    InvalidDsn(#[from] ParseDsnError),

    /// The HTTP request failed or returned an error status.
    #[error("failed to send event")]
    Transport(#[from] HttpError),

    /// The event could not be serialized to JSON.
    #[error("failed to serialize event")]
    Serialization(#[from] serde_json::Error),

    /// The serialized event could not be compressed.
    #[error("failed to compress event")]
    Compression(#[source] io::Error),
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingDsn | Self::Config(_) => ErrorKind::Configuration,
            Self::InvalidDsn(_) => ErrorKind::InvalidDsn,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Serialization(_) | Self::Compression(_) => ErrorKind::Serialization,
        }
    }
}
