use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

/// Controls the log format.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Auto detect the best format.
    ///
    /// This chooses [`LogFormat::Pretty`] for TTY, otherwise [`LogFormat::Simplified`].
    #[default]
    Auto,

    /// Pretty printing with colors.
    ///
    /// ```text
    ///  INFO smontry_client::client: sending event
    /// ```
    Pretty,

    /// Simplified plain text output.
    ///
    /// ```text
    /// 2024-04-08T12:10:32.102054Z  INFO smontry_client::client: sending event
    /// ```
    Simplified,

    /// Dump out JSON lines.
    ///
    /// ```text
    /// {"timestamp":"2024-04-08T12:11:08.729716Z","level":"INFO","message":"sending event","target":"smontry_client::client"}
    /// ```
    Json,
}

/// Raised when parsing an unknown [`LogFormat`] or [`Level`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ParseLogOptionError;

impl fmt::Display for ParseLogOptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid logging option")
    }
}

impl std::error::Error for ParseLogOptionError {}

impl FromStr for LogFormat {
    type Err = ParseLogOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "auto" => Self::Auto,
            "pretty" => Self::Pretty,
            "simplified" => Self::Simplified,
            "json" => Self::Json,
            _ => return Err(ParseLogOptionError),
        })
    }
}

/// The maximum log level of Smontry's own crates.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Disables logging entirely.
    Off,
    /// Only errors.
    Error,
    /// Warnings and errors.
    Warn,
    /// Informational messages.
    #[default]
    Info,
    /// Messages relevant to debugging.
    Debug,
    /// Everything.
    Trace,
}

impl Level {
    /// Returns the `tracing` filter matching this level.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Off => LevelFilter::OFF,
            Self::Error => LevelFilter::ERROR,
            Self::Warn => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.level_filter().fmt(f)
    }
}

impl FromStr for Level {
    type Err = ParseLogOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "off" => Self::Off,
            "error" => Self::Error,
            "warn" | "warning" => Self::Warn,
            "info" => Self::Info,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => return Err(ParseLogOptionError),
        })
    }
}

/// Controls the logging system.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// The log level for Smontry.
    pub level: Level,

    /// Controls the log output format.
    ///
    /// Defaults to [`LogFormat::Auto`], which detects the best format based on the TTY.
    pub format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!("warning".parse(), Ok(Level::Warn));
        assert_eq!("TRACE".parse(), Ok(Level::Trace));
        assert_eq!("loud".parse::<Level>(), Err(ParseLogOptionError));
    }

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Debug.to_string(), "debug");
        assert_eq!(Level::Off.to_string(), "off");
    }

    #[test]
    fn test_deserialize_config() {
        let config: LogConfig =
            serde_json::from_str(r#"{"level": "debug", "format": "json"}"#).unwrap();
        assert_eq!(config.level, Level::Debug);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: LogConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.level, Level::Info);
        assert_eq!(config.format, LogFormat::Auto);
    }
}
