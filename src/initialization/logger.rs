//! Logger initialization.
//!
//! This module provides the `env_logger` setup shared by the binary and by
//! anyone embedding the library who wants the same log format.

use std::io::{IsTerminal, Write};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::LevelFilter;

/// Level used when neither `--log-level` nor `RUST_LOG` is given.
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

/// Initializes the logger with the specified level and format.
///
/// Configures `env_logger` with custom formatting. Supports both plain text
/// (colored when stderr is a terminal) and JSON formats for structured logging.
/// Logs go to stderr so they never mix with the results printed on stdout.
///
/// The logger reads from the `RUST_LOG` environment variable first. An
/// explicit `level` overrides it for this crate; without one, `RUST_LOG`
/// applies as written, and the default is warn when it is unset.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger was already installed.
///
/// # Examples
///
/// ```bash
/// # Use RUST_LOG for quick debugging (no CLI args needed)
/// RUST_LOG=debug geoprobe --country-db country.mmdb --asn-db asn.mmdb
///
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=geoprobe=debug,reqwest=info geoprobe
///
/// # An explicit level wins over RUST_LOG for geoprobe itself
/// RUST_LOG=info geoprobe --log-level trace
/// ```
pub fn init_logger_with(
    level: Option<LevelFilter>,
    format: LogFormat,
) -> Result<(), InitializationError> {
    colored::control::set_override(std::io::stderr().is_terminal());

    let mut builder = env_logger::Builder::from_default_env();

    let rust_log_set = std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_some();
    if let Some(level) = effective_level(level, rust_log_set) {
        builder.filter_level(level);
        builder.filter_module("reqwest", LevelFilter::Info);
        builder.filter_module("hyper", LevelFilter::Info);
        builder.filter_module("hyper_util", LevelFilter::Info);
        builder.filter_module("rustls", LevelFilter::Warn);
        builder.filter_module("geoprobe", level);
    }

    builder.target(env_logger::Target::Stderr);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
                    chrono::Utc::now().timestamp_millis(),
                    record.level(),
                    record.target(),
                    serde_json::to_string(&record.args().to_string())
                        .unwrap_or_else(|_| "\"\"".into())
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let level = record.level();
                let colored_level = match level {
                    log::Level::Error => level.to_string().red(),
                    log::Level::Warn => level.to_string().yellow(),
                    log::Level::Info => level.to_string().green(),
                    log::Level::Debug => level.to_string().blue(),
                    log::Level::Trace => level.to_string().purple(),
                };

                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    chrono::Local::now().format("%H:%M:%S%.3f").to_string().dimmed(),
                    record.target().cyan(),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    // try_init() so a second initialization (tests, embedding) reports an error instead of panicking
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

/// The level to force on top of `RUST_LOG`, if any.
fn effective_level(explicit: Option<LevelFilter>, rust_log_set: bool) -> Option<LevelFilter> {
    match explicit {
        Some(level) => Some(level),
        None if rust_log_set => None,
        None => Some(DEFAULT_LOG_LEVEL),
    }
}
