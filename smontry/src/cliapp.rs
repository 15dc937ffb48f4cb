// This module implements the definition of the command line app.
//
// It must not import anything from the rest of the crate, so the definition stays
// independent of the command implementations.

use std::path::PathBuf;

use clap::builder::ValueParser;
use clap::{Arg, ArgAction, Command, value_parser};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const ABOUT: &str = "Smontry submits messages to a Sentry store endpoint.";

pub fn make_app() -> Command {
    Command::new("smontry")
        .disable_help_subcommand(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .propagate_version(true)
        .max_term_width(79)
        .version(VERSION)
        .about(ABOUT)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_name("CONFIG")
                .value_parser(value_parser!(PathBuf))
                .env("SMONTRY_CONFIG")
                .help("The path to the config folder containing config.yml."),
        )
        .arg(
            Arg::new("dsn")
                .long("dsn")
                .global(true)
                .value_name("DSN")
                .help("The DSN to submit events to. Overrides SENTRY_DSN."),
        )
        .arg(
            Arg::new("environment")
                .long("environment")
                .short('e')
                .global(true)
                .value_name("ENVIRONMENT")
                .help("The environment of submitted events. Overrides SENTRY_ENVIRONMENT."),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .global(true)
                .value_name("SECONDS")
                .value_parser(value_parser!(u64))
                .help("The timeout for the request in seconds."),
        )
        .arg(
            Arg::new("log_level")
                .long("log-level")
                .global(true)
                .value_name("LEVEL")
                .value_parser(["off", "error", "warn", "info", "debug", "trace"])
                .help("The log level for smontry."),
        )
        .arg(
            Arg::new("log_format")
                .long("log-format")
                .global(true)
                .value_name("FORMAT")
                .value_parser(["auto", "pretty", "simplified", "json"])
                .help("The log output format."),
        )
        .subcommand(
            Command::new("send")
                .about("Send a message event")
                .after_help(
                    "This sends a single message event and prints the raw response body \
                     to stdout.  Without a message, a test message with a random \
                     identifier is sent, which can be used to verify a DSN end to end.",
                )
                .arg(
                    Arg::new("message")
                        .value_name("MESSAGE")
                        .help("The message to send."),
                )
                .arg(
                    Arg::new("level")
                        .long("level")
                        .short('l')
                        .value_name("LEVEL")
                        .default_value("info")
                        .value_parser(ValueParser::new(parse_level))
                        .help("The level of the event."),
                ),
        )
        .subcommand(
            Command::new("dsn")
                .about("Show the endpoint and auth header for a DSN")
                .after_help(
                    "This parses the given DSN without sending anything and prints \
                     the store endpoint and the X-Sentry-Auth header that would be \
                     used.  The header is shown without a timestamp.",
                )
                .arg(
                    Arg::new("dsn_value")
                        .value_name("DSN")
                        .required(true)
                        .action(ArgAction::Set)
                        .help("The DSN to parse."),
                ),
        )
}

fn parse_level(value: &str) -> Result<smontry_client::Level, String> {
    value
        .parse()
        .map_err(|_| "expected one of debug, info, warning, error, fatal".to_owned())
}
