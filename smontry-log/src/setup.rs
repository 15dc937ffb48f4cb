use std::env;
use std::io;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{LogConfig, LogFormat};

/// Environment variable holding filter directives that replace the defaults.
///
/// The syntax is the same as for `RUST_LOG`, for example `smontry_client=trace,reqwest=debug`.
pub const LOG_FILTER_ENV: &str = "SMONTRY_LOG";

/// All crates in the workspace, which log at the configured level.
const CRATE_NAMES: &[&str] = &["smontry", "smontry_client", "smontry_config", "smontry_log"];

/// Returns the default filter directives for the given level.
///
/// Internal crates log up to `level`, third-party crates at most at `INFO`.
fn default_directives(level: LevelFilter) -> String {
    let third_party = level.min(LevelFilter::INFO);

    let mut directives = third_party.to_string();
    for name in CRATE_NAMES {
        directives.push_str(&format!(",{name}={level}"));
    }
    directives
}

fn env_filter(config: &LogConfig) -> EnvFilter {
    match env::var(LOG_FILTER_ENV) {
        Ok(directives) if !directives.is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(default_directives(config.level.level_filter())),
    }
}

/// Initialize the logging system.
///
/// Logs are written to `stderr`, so that `stdout` remains free for command output. Calling this
/// more than once has no effect.
///
/// # Example
///
/// ```
/// let log_config = smontry_log::LogConfig {
///     level: smontry_log::Level::Debug,
///     ..Default::default()
/// };
///
/// smontry_log::init(&log_config);
/// ```
pub fn init(config: &LogConfig) {
    let format = match (config.format, console::user_attended_stderr()) {
        (LogFormat::Auto, true) => LogFormat::Pretty,
        (LogFormat::Auto, false) => LogFormat::Simplified,
        (format, _) => format,
    };

    let subscriber = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(true);

    let format = match format {
        LogFormat::Auto | LogFormat::Pretty => subscriber.compact().without_time().boxed(),
        LogFormat::Simplified => subscriber.with_ansi(false).boxed(),
        LogFormat::Json => subscriber
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(format.with_filter(env_filter(config)))
        .try_init()
        .ok();
}
