use smontry_client::Dsn;
use smontry_config::Config;

/// Initialize the logging system.
pub fn init_logging(config: &Config) {
    smontry_log::init(config.logging());
}

/// Print spawn infos to the log.
///
/// The DSN is logged without its keys.
pub fn dump_spawn_infos(config: &Config) {
    if config.path().as_os_str().is_empty() {
        smontry_log::debug!("launching smontry without config folder");
    } else {
        smontry_log::debug!(
            "launching smontry from config folder {}",
            config.path().display()
        );
    }

    match config.dsn().map(str::parse::<Dsn>) {
        Some(Ok(dsn)) => smontry_log::debug!(
            "  default target: project {} at {}",
            dsn.project_id(),
            dsn.host()
        ),
        Some(Err(_)) => smontry_log::debug!("  default target: invalid DSN"),
        None => smontry_log::debug!("  default target: -"),
    }
    smontry_log::debug!("  environment: {}", config.environment());
    smontry_log::debug!("  timeout: {}s", config.http_timeout().as_secs());
    smontry_log::debug!("  log level: {}", config.logging().level);
}
