use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use smontry_client::{AuthOptions, CLIENT, Client, Level, STORE_URL_TYPE, get_url_and_auth};
use smontry_config::{Config, OverridableConfig};
use uuid::Uuid;

use crate::cliapp::make_app;
use crate::setup;

/// Runs the command line application.
pub fn execute() -> Result<()> {
    let app = make_app();
    let matches = app.get_matches();
    let config = load_config(&matches)?;

    setup::init_logging(&config);
    setup::dump_spawn_infos(&config);

    match matches.subcommand() {
        Some(("send", send_matches)) => send(&config, send_matches),
        Some(("dsn", dsn_matches)) => show_dsn(dsn_matches),
        _ => unreachable!(),
    }
}

/// Loads the config file, then applies environment variables and command line arguments.
fn load_config(matches: &ArgMatches) -> Result<Config> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };

    config
        .apply_override(OverridableConfig::from_env())?
        .apply_override(extract_config_args(matches))?;

    Ok(config)
}

/// Extract config arguments from a parsed command line arguments object.
fn extract_config_args(matches: &ArgMatches) -> OverridableConfig {
    OverridableConfig {
        dsn: matches.get_one::<String>("dsn").cloned(),
        environment: matches.get_one::<String>("environment").cloned(),
        timeout: matches.get_one::<u64>("timeout").copied(),
        log_level: matches.get_one::<String>("log_level").cloned(),
        log_format: matches.get_one::<String>("log_format").cloned(),
    }
}

/// Returns the message used for smoke tests.
fn smoke_test_message() -> String {
    format!("This is Smontry, hello?! {}", Uuid::new_v4())
}

pub fn send(config: &Config, matches: &ArgMatches) -> Result<()> {
    let message = match matches.get_one::<String>("message") {
        Some(message) => message.clone(),
        None => smoke_test_message(),
    };
    let level = matches
        .get_one::<Level>("level")
        .copied()
        .unwrap_or_default();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let client = Client::new(config)?;
    let response = runtime.block_on(client.capture_message(&message, level, None))?;

    smontry_log::info!("sent {level} message: {message}");

    let mut stdout = io::stdout().lock();
    stdout.write_all(&response)?;
    stdout.write_all(b"\n")?;

    Ok(())
}

pub fn show_dsn(matches: &ArgMatches) -> Result<()> {
    let dsn = matches
        .get_one::<String>("dsn_value")
        .context("missing DSN argument")?;

    let options = AuthOptions {
        client: Some(CLIENT.to_owned()),
        ..Default::default()
    };
    let (url, auth) = get_url_and_auth(dsn, STORE_URL_TYPE, &options)?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "  url: {url}")?;
    writeln!(stdout, "  auth: {auth}")?;

    Ok(())
}
