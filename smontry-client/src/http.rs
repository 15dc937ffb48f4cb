use std::io::{self, Write};

use flate2::Compression;
use flate2::write::GzEncoder;
#[doc(inline)]
pub use reqwest::StatusCode;
use smontry_config::Config;

use crate::constants::CLIENT;

/// The header carrying Sentry authentication.
pub const AUTH_HEADER: &str = "X-Sentry-Auth";

/// An error from the HTTP transport.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The request could not be sent or the response could not be read.
    ///
    /// This covers connection failures and timeouts.
    #[error("could not send request")]
    Reqwest(#[from] reqwest::Error),
    /// The server responded with a non-success status code.
    #[error("server responded with status {0}")]
    Status(StatusCode),
}

impl HttpError {
    /// Returns the HTTP status code, if the server sent a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Reqwest(error) => error.status(),
            Self::Status(status) => Some(*status),
        }
    }

    /// Returns `true` if the error indicates a network downtime.
    pub fn is_network_error(&self) -> bool {
        match self {
            Self::Reqwest(error) => error.is_timeout() || error.is_connect(),
            Self::Status(_) => false,
        }
    }
}

/// Creates the HTTP client with the timeouts from the configuration.
pub(crate) fn build_client(config: &Config) -> Result<reqwest::Client, HttpError> {
    let client = reqwest::Client::builder()
        .user_agent(CLIENT)
        .timeout(config.http_timeout())
        .connect_timeout(config.http_connection_timeout())
        .build()?;

    Ok(client)
}

/// Compresses a payload with gzip.
pub fn encode_gzip(body: &[u8]) -> Result<Vec<u8>, io::Error> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body)?;
    encoder.finish()
}
