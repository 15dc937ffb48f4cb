//! Event payloads and their default fields.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::Value;
use smontry_config::Config;

use crate::constants::DEFAULT_PLATFORM;

/// An event payload.
///
/// Events are open maps, so callers can attach arbitrary fields. [`augment_event`] fills in the
/// standard fields that are missing.
pub type Event = serde_json::Map<String, Value>;

/// Raised when parsing an unknown [`Level`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, thiserror::Error)]
#[error("invalid level")]
pub struct ParseLevelError;

/// Severity level of an event.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Indicates very spammy debug information.
    Debug,
    /// Informational messages.
    #[default]
    Info,
    /// A warning.
    Warning,
    /// An error.
    Error,
    /// Similar to error but indicates a critical event that usually causes a shutdown.
    Fatal,
}

impl Level {
    /// Returns the wire name of the level.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        Ok(match string {
            "debug" => Level::Debug,
            "info" | "log" => Level::Info,
            "warning" => Level::Warning,
            "error" => Level::Error,
            "fatal" | "critical" => Level::Fatal,
            _ => return Err(ParseLevelError),
        })
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}

/// Creates a message event with the given level.
pub fn message_event(message: &str, level: Level) -> Event {
    let mut event = Event::new();
    event.insert("message".to_owned(), Value::from(message));
    event.insert("level".to_owned(), Value::from(level.as_str()));
    event
}

/// Values used to fill in missing event fields.
#[derive(Clone, Debug, PartialEq)]
pub struct EventDefaults {
    /// The host name of this machine, if it could be resolved.
    pub server_name: Option<String>,
    /// The deployment environment.
    pub environment: String,
    /// The platform identifier.
    pub platform: String,
}

impl EventDefaults {
    /// Resolves the defaults from configuration and the local host name.
    pub fn from_config(config: &Config) -> Self {
        Self {
            server_name: local_hostname(),
            environment: config.environment().to_owned(),
            platform: DEFAULT_PLATFORM.to_owned(),
        }
    }
}

fn local_hostname() -> Option<String> {
    hostname::get().ok().and_then(|s| s.into_string().ok())
}

/// Formats a timestamp as ISO 8601 with microseconds and a `Z` suffix.
///
/// ```
/// use chrono::{TimeZone, Utc};
///
/// let time = Utc.with_ymd_and_hms(2022, 3, 4, 5, 6, 7).unwrap();
/// assert_eq!(smontry_client::format_timestamp(time), "2022-03-04T05:06:07.000000Z");
/// ```
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Returns a copy of the event with missing standard fields filled in.
///
/// The input event is not modified. Fields the caller has set, including explicit `null`
/// values, are kept as they are:
///
///  - `server_name`: the local host name, if it could be resolved.
///  - `environment`: the configured environment.
///  - `platform`: the platform identifier.
///  - `timestamp`: the current UTC time.
pub fn augment_event(event: &Event, defaults: &EventDefaults) -> Event {
    augment_event_at(event, defaults, Utc::now())
}

fn augment_event_at(event: &Event, defaults: &EventDefaults, now: DateTime<Utc>) -> Event {
    let mut event = event.clone();

    if let Some(ref server_name) = defaults.server_name {
        event
            .entry("server_name")
            .or_insert_with(|| Value::from(server_name.as_str()));
    }

    event
        .entry("environment")
        .or_insert_with(|| Value::from(defaults.environment.as_str()));

    event
        .entry("platform")
        .or_insert_with(|| Value::from(defaults.platform.as_str()));

    event
        .entry("timestamp")
        .or_insert_with(|| Value::from(format_timestamp(now)));

    event
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn defaults() -> EventDefaults {
        EventDefaults {
            server_name: Some("web-1".to_owned()),
            environment: "production".to_owned(),
            platform: "python".to_owned(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 3, 4, 5, 6, 7).unwrap() + chrono::Duration::microseconds(89)
    }

    #[test]
    fn test_augment_fills_defaults() {
        let event = message_event("hello", Level::Info);
        let augmented = augment_event_at(&event, &defaults(), now());

        insta::assert_json_snapshot!(augmented, @r###"
        {
          "environment": "production",
          "level": "info",
          "message": "hello",
          "platform": "python",
          "server_name": "web-1",
          "timestamp": "2022-03-04T05:06:07.000089Z"
        }
        "###);
    }

    #[test]
    fn test_augment_keeps_supplied_fields() {
        let event = json!({
            "message": "hello",
            "level": "error",
            "server_name": "custom-host",
            "environment": "staging",
            "platform": "rust",
            "timestamp": "2000-01-01T00:00:00.000000Z",
        });
        let event = event.as_object().unwrap().clone();

        let augmented = augment_event_at(&event, &defaults(), now());
        similar_asserts::assert_eq!(augmented, event);
    }

    #[test]
    fn test_augment_keeps_explicit_null() {
        let event = json!({"message": "hello", "server_name": null});
        let event = event.as_object().unwrap().clone();

        let augmented = augment_event_at(&event, &defaults(), now());
        assert_eq!(augmented["server_name"], Value::Null);
    }

    #[test]
    fn test_augment_does_not_mutate_input() {
        let event = message_event("hello", Level::Warning);
        let before = event.clone();

        let augmented = augment_event(&event, &defaults());

        similar_asserts::assert_eq!(event, before);
        assert_eq!(event.len(), 2);
        assert_eq!(augmented.len(), 6);
    }

    #[test]
    fn test_augment_without_hostname() {
        let defaults = EventDefaults {
            server_name: None,
            ..defaults()
        };

        let augmented = augment_event_at(&message_event("hello", Level::Info), &defaults, now());
        assert!(!augmented.contains_key("server_name"));
        assert_eq!(augmented["environment"], "production");
    }

    #[test]
    fn test_augment_keeps_custom_fields() {
        let event = json!({"message": "hello", "tags": {"release": "1.0"}});
        let event = event.as_object().unwrap().clone();

        let augmented = augment_event_at(&event, &defaults(), now());
        assert_eq!(augmented["tags"], json!({"release": "1.0"}));
    }

    #[test]
    fn test_defaults_from_config() {
        let config =
            Config::from_json_value(json!({"sentry": {"environment": "staging"}})).unwrap();
        let defaults = EventDefaults::from_config(&config);
        assert_eq!(defaults.environment, "staging");
        assert_eq!(defaults.platform, "python");
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(format_timestamp(now()), "2022-03-04T05:06:07.000089Z");
    }

    #[test]
    fn test_parse_level() {
        assert_eq!("log".parse(), Ok(Level::Info));
        assert_eq!("critical".parse(), Ok(Level::Fatal));
        assert_eq!("warning".parse(), Ok(Level::Warning));
        assert_eq!("loud".parse::<Level>(), Err(ParseLevelError));
    }

    #[test]
    fn test_level_serde() {
        assert_eq!(serde_json::to_string(&Level::Fatal).unwrap(), r#""fatal""#);
        assert_eq!(
            serde_json::from_str::<Level>(r#""debug""#).unwrap(),
            Level::Debug
        );
    }
}
