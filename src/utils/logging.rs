//! Diagnostic logging setup on top of `env_logger`.

use super::config::Config;
use super::error::ConfigError;
use chrono::Local;
use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;
use std::io::Write;

/// Timestamp layout for every diagnostic line
const TIMESTAMP_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// Install the global logger
///
/// **Public** - called once by main.rs
///
/// Level comes from `LOG_LEVEL` (`verbose` forces debug); `RUST_LOG` wins over both.
/// With `LOG_FILE` set, lines are appended to that file instead of stderr.
///
/// # Errors
/// * `ConfigError::LogFileUnavailable` - LOG_FILE cannot be opened for append
pub fn init_logging(config: &Config, verbose: bool) -> Result<(), ConfigError> {
    let level = if verbose { "debug" } else { config.log_level.as_str() };

    let mut builder = Builder::from_env(Env::default().default_filter_or(level));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {} {}",
            Local::now().format(TIMESTAMP_FORMAT),
            record.level(),
            record.args()
        )
    });

    if let Some(path) = &config.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| ConfigError::LogFileUnavailable {
                path: path.clone(),
                source,
            })?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    // A logger may already be installed (tests, repeated calls)
    let _ = builder.try_init();

    Ok(())
}
