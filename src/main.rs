//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `geoprobe` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use geoprobe::config::Opt;
use geoprobe::initialization::init_logger_with;
use geoprobe::report::{render_json, render_summary};
use geoprobe::{resolve, OutputFormat, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().map(Into::into), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let settings = Settings::from(&opt);
    let results = resolve(&settings).await;

    match opt.output {
        OutputFormat::Summary => print!("{}", render_summary(&results)),
        OutputFormat::Json => {
            let json = render_json(&results).context("Failed to serialize results")?;
            println!("{}", json);
        }
    }

    if !results.good() {
        process::exit(1);
    }
    Ok(())
}
