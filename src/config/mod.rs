//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (lookup endpoint, timeouts, field paths)
//! - The library [`Settings`] value
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{LogFormat, LogLevel, Opt, OutputFormat, Settings};
