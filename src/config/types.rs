//! Configuration types and CLI options.
//!
//! This module defines the library-level [`Settings`] and the enums and structs
//! used for command-line argument parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    ASN_DB_ENV, CA_BUNDLE_ENV, COUNTRY_DB_ENV, DEFAULT_TIMEOUT, DEFAULT_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// How the binary prints the lookup results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Summary block followed by the lookup transcript
    Summary,
    /// A single JSON document
    Json,
}

/// Settings for one resolution (no CLI dependencies).
///
/// Settings are only borrowed by [`crate::Resolver::resolve`], so the same value
/// can be reused for any number of independent lookups.
///
/// # Examples
///
/// ```no_run
/// use geoprobe::Settings;
/// use std::time::Duration;
///
/// let settings = Settings::default()
///     .with_timeout(Duration::from_secs(10))
///     .with_country_db_path("country.mmdb")
///     .with_asn_db_path("asn.mmdb");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Timeout for the address lookup request
    pub timeout: Duration,

    /// PEM bundle of trust anchors; `None` or an empty path uses the builtin roots
    pub ca_bundle_path: Option<PathBuf>,

    /// Path to the country database (.mmdb)
    pub country_db_path: Option<PathBuf>,

    /// Path to the ASN database (.mmdb)
    pub asn_db_path: Option<PathBuf>,

    /// Run the country and ASN lookups on parallel blocking tasks
    pub concurrent_lookups: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            ca_bundle_path: None,
            country_db_path: None,
            asn_db_path: None,
            concurrent_lookups: true,
        }
    }
}

impl Settings {
    /// Sets the address lookup timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the CA bundle used to verify the lookup endpoint.
    ///
    /// An empty path keeps the builtin roots.
    pub fn with_ca_bundle_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_bundle_path = non_empty(Some(path.into()));
        self
    }

    /// Sets the country database path.
    pub fn with_country_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.country_db_path = Some(path.into());
        self
    }

    /// Sets the ASN database path.
    pub fn with_asn_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.asn_db_path = Some(path.into());
        self
    }

    /// Chooses between concurrent and sequential database lookups.
    pub fn with_concurrent_lookups(mut self, concurrent: bool) -> Self {
        self.concurrent_lookups = concurrent;
        self
    }
}

/// Command-line options for the `geoprobe` binary.
///
/// # Examples
///
/// ```bash
/// # Basic usage
/// geoprobe --country-db country.mmdb --asn-db asn.mmdb
///
/// # Paths from the environment, JSON output
/// GEOPROBE_COUNTRY_DB=country.mmdb GEOPROBE_ASN_DB=asn.mmdb geoprobe --output json
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "geoprobe",
    about = "Discovers the probe IP and resolves its country code, ASN and network name."
)]
pub struct Opt {
    /// Path to the country database (.mmdb)
    #[arg(long, env = COUNTRY_DB_ENV, value_parser)]
    pub country_db: Option<PathBuf>,

    /// Path to the ASN database (.mmdb)
    #[arg(long, env = ASN_DB_ENV, value_parser)]
    pub asn_db: Option<PathBuf>,

    /// PEM bundle of CA certificates used to verify the lookup endpoint.
    /// Empty means the builtin roots.
    #[arg(long, env = CA_BUNDLE_ENV, value_parser = parse_path_allow_empty)]
    pub ca_bundle_path: Option<PathBuf>,

    /// Address lookup timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Query the two databases one after the other instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Log level: error|warn|info|debug|trace. Defaults to RUST_LOG, or warn
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Output format: summary|json
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    pub output: OutputFormat,
}

/// Like clap's path parser, but lets an empty value through.
fn parse_path_allow_empty(value: &str) -> Result<PathBuf, std::convert::Infallible> {
    Ok(PathBuf::from(value))
}

fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|path| !path.as_os_str().is_empty())
}

impl From<&Opt> for Settings {
    fn from(opt: &Opt) -> Self {
        Settings {
            timeout: Duration::from_secs(opt.timeout_seconds),
            ca_bundle_path: non_empty(opt.ca_bundle_path.clone()),
            country_db_path: opt.country_db.clone(),
            asn_db_path: opt.asn_db.clone(),
            concurrent_lookups: !opt.sequential,
        }
    }
}
