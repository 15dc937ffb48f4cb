use std::fmt;

use bytes::Bytes;
use chrono::Utc;
use reqwest::header;
use smontry_config::Config;

use crate::auth::{AuthOptions, get_url_and_auth};
use crate::constants::{CLIENT, PROTOCOL_VERSION, STORE_URL_TYPE};
use crate::error::Error;
use crate::event::{Event, EventDefaults, Level, augment_event, message_event};
use crate::http::{self, AUTH_HEADER, HttpError};

/// Submits events to a Sentry store endpoint.
///
/// Each call sends exactly one request. Failed requests are not retried, and errors are returned
/// to the caller as they are. The client is cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    dsn: Option<String>,
    defaults: EventDefaults,
}

impl Client {
    /// Creates a client from configuration.
    ///
    /// The default DSN, the event defaults and the HTTP timeouts are taken from `config`. The
    /// local host name is resolved once here.
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            http: http::build_client(config)?,
            dsn: config.dsn().map(str::to_owned),
            defaults: EventDefaults::from_config(config),
        })
    }

    /// Replaces the defaults used to augment events.
    pub fn with_defaults(mut self, defaults: EventDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Returns the defaults used to augment events.
    pub fn defaults(&self) -> &EventDefaults {
        &self.defaults
    }

    /// Sends a message event with the given level.
    ///
    /// See [`store_event`](Self::store_event) for how the DSN is chosen.
    pub async fn capture_message(
        &self,
        message: &str,
        level: Level,
        dsn: Option<&str>,
    ) -> Result<Bytes, Error> {
        self.store_event(dsn, &message_event(message, level)).await
    }

    /// Sends an event to the store endpoint and returns the raw response body.
    ///
    /// The event is augmented with default fields before it is sent. `dsn` takes precedence over
    /// the configured default DSN. An empty `dsn` counts as absent.
    pub async fn store_event(&self, dsn: Option<&str>, event: &Event) -> Result<Bytes, Error> {
        let dsn = dsn
            .filter(|dsn| !dsn.is_empty())
            .or(self.dsn.as_deref())
            .ok_or(Error::MissingDsn)?;

        let options = AuthOptions {
            client: Some(CLIENT.to_owned()),
            timestamp: Some(Utc::now()),
            version: PROTOCOL_VERSION,
        };
        let (url, auth) = get_url_and_auth(dsn, STORE_URL_TYPE, &options)?;

        let event = augment_event(event, &self.defaults);
        let json = serde_json::to_vec(&event)?;
        let body = http::encode_gzip(&json).map_err(Error::Compression)?;

        smontry_log::debug!(
            url = %url,
            size = json.len(),
            compressed_size = body.len(),
            "sending event"
        );

        let response = self
            .http
            .post(&url)
            .header(header::CONTENT_ENCODING, "gzip")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, CLIENT)
            .header(AUTH_HEADER, auth)
            .body(body)
            .send()
            .await
            .map_err(HttpError::from)?;

        let status = response.status();
        smontry_log::trace!(status = status.as_u16(), "received response");

        if !status.is_success() {
            return Err(HttpError::Status(status).into());
        }

        let body = response.bytes().await.map_err(HttpError::from)?;
        Ok(body)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("dsn", &self.dsn.as_ref().map(|_| "[redacted]"))
            .field("defaults", &self.defaults)
            .finish()
    }
}

/// Sends a message event using configuration from the environment.
///
/// The environment is read on every call. `dsn` takes precedence over `SENTRY_DSN`, and
/// `SENTRY_ENVIRONMENT` sets the environment of the event. Prefer creating a [`Client`] once
/// when sending more than one event.
pub async fn capture_message(
    message: &str,
    level: Level,
    dsn: Option<&str>,
) -> Result<Bytes, Error> {
    let config = Config::from_env()?;
    Client::new(&config)?
        .capture_message(message, level, dsn)
        .await
}
