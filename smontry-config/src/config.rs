use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use smontry_log::{Level, LogConfig, LogFormat};

use crate::OverridableConfig;

/// The environment reported for events when nothing else is configured.
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// The basename of the config file within the config folder.
const CONFIG_FILE_NAME: &str = "config.yml";

/// Defines the source of a config error.
#[derive(Debug, Default)]
enum ConfigErrorSource {
    /// An error occurring independently.
    #[default]
    None,
    /// An error originating from a configuration file.
    File(PathBuf),
    /// An error originating in a field override (an env var, or a CLI parameter).
    FieldOverride(String),
}

/// Indicates config related errors.
#[derive(Debug, thiserror::Error, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ConfigErrorKind {
    /// Failed to open the file.
    #[error("could not open config file")]
    CouldNotOpenFile,
    /// Parsing YAML failed.
    #[error("could not parse yaml config file")]
    BadYaml,
    /// Parsing JSON failed.
    #[error("could not parse json config")]
    BadJson,
    /// Invalid config value.
    #[error("invalid config value")]
    InvalidValue,
}

/// Indicates config related errors.
#[derive(Debug)]
pub struct ConfigError {
    source: ConfigErrorSource,
    kind: ConfigErrorKind,
    inner: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl ConfigError {
    #[inline]
    fn new(kind: ConfigErrorKind) -> Self {
        Self {
            source: ConfigErrorSource::None,
            kind,
            inner: None,
        }
    }

    #[inline]
    fn wrap<E>(inner: E, kind: ConfigErrorKind) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            source: ConfigErrorSource::None,
            kind,
            inner: Some(Box::new(inner)),
        }
    }

    #[inline]
    pub(crate) fn for_field<E>(inner: E, field: &'static str) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::wrap(inner, ConfigErrorKind::InvalidValue).field(field)
    }

    #[inline]
    fn file<P: AsRef<Path>>(mut self, p: P) -> Self {
        self.source = ConfigErrorSource::File(p.as_ref().to_path_buf());
        self
    }

    #[inline]
    pub(crate) fn field(mut self, name: &'static str) -> Self {
        self.source = ConfigErrorSource::FieldOverride(name.to_owned());
        self
    }

    /// Returns the error kind of the error.
    pub fn kind(&self) -> ConfigErrorKind {
        self.kind
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            ConfigErrorSource::None => self.kind.fmt(f),
            ConfigErrorSource::File(file_name) => {
                write!(f, "{} (file {})", self.kind, file_name.display())
            }
            ConfigErrorSource::FieldOverride(name) => write!(f, "{} (field {})", self.kind, name),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner
            .as_ref()
            .map(|inner| inner.as_ref() as &(dyn Error + 'static))
    }
}

/// Settings for the event collection target.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
struct Sentry {
    /// The default DSN used when a call does not pass one explicitly.
    dsn: Option<String>,
    /// The environment tag for events that do not declare one.
    environment: Option<String>,
}

/// Controls the HTTP transport.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
struct Http {
    /// Timeout for the whole request in seconds.
    ///
    /// The timeout covers the entire exchange, from connecting until the response body was read.
    timeout: u64,
    /// Timeout for establishing connections in seconds.
    ///
    /// This includes TLS handshakes.
    connection_timeout: u64,
}

impl Default for Http {
    fn default() -> Self {
        Http {
            timeout: 5,
            connection_timeout: 3,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(default)]
struct ConfigValues {
    sentry: Sentry,
    http: Http,
    logging: LogConfig,
}

impl ConfigValues {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let f = fs::File::open(path)
            .map_err(|e| ConfigError::wrap(e, ConfigErrorKind::CouldNotOpenFile).file(path))?;

        serde_yaml::from_reader(io::BufReader::new(f))
            .map_err(|e| ConfigError::wrap(e, ConfigErrorKind::BadYaml).file(path))
    }

    /// Checks values that deserialize fine but cannot be used.
    ///
    /// Returns the name of the offending field.
    fn validate(&self) -> Result<(), &'static str> {
        if self.http.timeout == 0 {
            return Err("http.timeout");
        }
        if self.http.connection_timeout == 0 {
            return Err("http.connection_timeout");
        }
        Ok(())
    }
}

/// Config struct.
#[derive(Clone, Debug, Default)]
pub struct Config {
    values: ConfigValues,
    path: PathBuf,
}

impl Config {
    /// Loads a config from a given config folder.
    ///
    /// The folder must contain a `config.yml` file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let config_file = path.join(CONFIG_FILE_NAME);

        let values = ConfigValues::load(&config_file)?;
        values
            .validate()
            .map_err(|_| ConfigError::new(ConfigErrorKind::InvalidValue).file(&config_file))?;

        Ok(Config { values, path })
    }

    /// Creates a config from the process environment.
    ///
    /// This starts with the default configuration and applies [`OverridableConfig::from_env`].
    pub fn from_env() -> Result<Config, ConfigError> {
        let mut config = Config::default();
        config.apply_override(OverridableConfig::from_env())?;
        Ok(config)
    }

    /// Creates a config from a JSON value.
    ///
    /// This is mostly useful for tests.
    pub fn from_json_value(value: serde_json::Value) -> Result<Config, ConfigError> {
        let values: ConfigValues = serde_json::from_value(value)
            .map_err(|err| ConfigError::wrap(err, ConfigErrorKind::BadJson))?;
        values
            .validate()
            .map_err(|field| ConfigError::new(ConfigErrorKind::InvalidValue).field(field))?;

        Ok(Config {
            values,
            path: PathBuf::new(),
        })
    }

    /// Override configuration with values coming from other sources (e.g. env variables or
    /// command line parameters).
    ///
    /// Empty strings are treated as absent values.
    pub fn apply_override(
        &mut self,
        overrides: OverridableConfig,
    ) -> Result<&mut Self, ConfigError> {
        let sentry = &mut self.values.sentry;

        if let Some(dsn) = overrides.dsn.filter(|s| !s.is_empty()) {
            sentry.dsn = Some(dsn);
        }

        if let Some(environment) = overrides.environment.filter(|s| !s.is_empty()) {
            sentry.environment = Some(environment);
        }

        let http = &mut self.values.http;

        if let Some(timeout) = overrides.timeout {
            if timeout == 0 {
                return Err(ConfigError::new(ConfigErrorKind::InvalidValue).field("timeout"));
            }
            http.timeout = timeout;
        }

        let logging = &mut self.values.logging;

        if let Some(level) = overrides.log_level {
            logging.level = level
                .parse::<Level>()
                .map_err(|err| ConfigError::for_field(err, "log_level"))?;
        }

        if let Some(format) = overrides.log_format {
            logging.format = format
                .parse::<LogFormat>()
                .map_err(|err| ConfigError::for_field(err, "log_format"))?;
        }

        Ok(self)
    }

    /// Returns the path of the config folder.
    ///
    /// This is empty if the configuration was not loaded from a folder.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the default DSN, if configured.
    ///
    /// An empty DSN counts as not configured.
    pub fn dsn(&self) -> Option<&str> {
        self.values
            .sentry
            .dsn
            .as_deref()
            .filter(|s| !s.is_empty())
    }

    /// Returns the environment tag for events.
    ///
    /// Defaults to [`DEFAULT_ENVIRONMENT`] if missing or empty.
    pub fn environment(&self) -> &str {
        self.values
            .sentry
            .environment
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ENVIRONMENT)
    }

    /// Returns the timeout for a full HTTP request.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.values.http.timeout)
    }

    /// Returns the timeout for establishing HTTP connections.
    pub fn http_connection_timeout(&self) -> Duration {
        Duration::from_secs(self.values.http.connection_timeout)
    }

    /// Returns the logging configuration.
    pub fn logging(&self) -> &LogConfig {
        &self.values.logging
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.dsn(), None);
        assert_eq!(config.environment(), "production");
        assert_eq!(config.http_timeout(), Duration::from_secs(5));
        assert_eq!(config.http_connection_timeout(), Duration::from_secs(3));
        assert_eq!(config.logging().level, Level::Info);
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.yml"),
            "sentry:\n  dsn: https://public@sentry.example.com/42\n  environment: staging\nhttp:\n  timeout: 10\n",
        )
        .unwrap();

        let config = Config::from_path(dir.path()).unwrap();
        assert_eq!(config.dsn(), Some("https://public@sentry.example.com/42"));
        assert_eq!(config.environment(), "staging");
        assert_eq!(config.http_timeout(), Duration::from_secs(10));
        assert_eq!(config.http_connection_timeout(), Duration::from_secs(3));
        assert_eq!(config.path(), dir.path());
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = Config::from_path(dir.path()).unwrap_err();
        assert_eq!(error.kind(), ConfigErrorKind::CouldNotOpenFile);
        assert!(error.to_string().contains("config.yml"));
    }

    #[test]
    fn test_from_path_bad_yaml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.yml"), "http:\n  timeout: [soon]\n").unwrap();

        let error = Config::from_path(dir.path()).unwrap_err();
        assert_eq!(error.kind(), ConfigErrorKind::BadYaml);
        assert!(error.source().is_some());
    }

    #[test]
    fn test_from_path_empty_values() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.yml"),
            "sentry:\n  dsn: \"\"\n  environment: \"\"\n",
        )
        .unwrap();

        let config = Config::from_path(dir.path()).unwrap();
        assert_eq!(config.dsn(), None);
        assert_eq!(config.environment(), DEFAULT_ENVIRONMENT);
    }

    #[test]
    fn test_from_path_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.yml"), "http:\n  timeout: 0\n").unwrap();

        let error = Config::from_path(dir.path()).unwrap_err();
        assert_eq!(error.kind(), ConfigErrorKind::InvalidValue);
        assert!(error.to_string().contains("config.yml"));
    }

    #[test]
    fn test_zero_connection_timeout() {
        let error = Config::from_json_value(json!({
            "http": {"connection_timeout": 0}
        }))
        .unwrap_err();

        insta::assert_snapshot!(error.to_string(), @"invalid config value (field http.connection_timeout)");
    }

    #[test]
    fn test_override_beats_file() {
        let mut config = Config::from_json_value(json!({
            "sentry": {
                "dsn": "https://file@sentry.example.com/1",
                "environment": "staging",
            }
        }))
        .unwrap();

        config
            .apply_override(OverridableConfig {
                dsn: Some("https://cli@sentry.example.com/2".to_owned()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(config.dsn(), Some("https://cli@sentry.example.com/2"));
        assert_eq!(config.environment(), "staging");
    }

    #[test]
    fn test_override_layers() {
        let mut config = Config::from_json_value(json!({
            "sentry": {"dsn": "https://file@sentry.example.com/1"}
        }))
        .unwrap();

        // Environment first, then command line arguments on top.
        config
            .apply_override(OverridableConfig {
                dsn: Some("https://env@sentry.example.com/2".to_owned()),
                environment: Some("env".to_owned()),
                ..Default::default()
            })
            .unwrap()
            .apply_override(OverridableConfig {
                dsn: Some("https://cli@sentry.example.com/3".to_owned()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(config.dsn(), Some("https://cli@sentry.example.com/3"));
        assert_eq!(config.environment(), "env");
    }

    #[test]
    fn test_override_empty_is_absent() {
        let mut config = Config::from_json_value(json!({
            "sentry": {"dsn": "https://file@sentry.example.com/1"}
        }))
        .unwrap();

        config
            .apply_override(OverridableConfig {
                dsn: Some(String::new()),
                environment: Some(String::new()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(config.dsn(), Some("https://file@sentry.example.com/1"));
        assert_eq!(config.environment(), DEFAULT_ENVIRONMENT);
    }

    #[test]
    fn test_override_invalid_log_level() {
        let error = Config::default()
            .apply_override(OverridableConfig {
                log_level: Some("chatty".to_owned()),
                ..Default::default()
            })
            .unwrap_err();

        assert_eq!(error.kind(), ConfigErrorKind::InvalidValue);
        insta::assert_snapshot!(error.to_string(), @"invalid config value (field log_level)");
    }

    #[test]
    fn test_override_zero_timeout() {
        let error = Config::default()
            .apply_override(OverridableConfig {
                timeout: Some(0),
                ..Default::default()
            })
            .unwrap_err();

        insta::assert_snapshot!(error.to_string(), @"invalid config value (field timeout)");
    }

    #[test]
    fn test_logging_override() {
        let mut config = Config::default();
        config
            .apply_override(OverridableConfig {
                log_level: Some("debug".to_owned()),
                log_format: Some("json".to_owned()),
                ..Default::default()
            })
            .unwrap();

        similar_asserts::assert_eq!(config.logging().level, Level::Debug);
        similar_asserts::assert_eq!(config.logging().format, LogFormat::Json);
    }
}
