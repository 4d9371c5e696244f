//! Error handling.
//!
//! This module provides:
//! - The [`ErrorKind`] classification recorded in lookup results
//! - Collaborator error types ([`TransportError`], [`DatabaseError`])
//! - Initialization errors for the binary
//!
//! Stage failures never propagate out of a resolution. They are converted into
//! an [`ErrorKind`] and a transcript line instead.

mod types;

// Re-export public API
pub use types::{DatabaseError, ErrorKind, InitializationError, TransportError, TransportErrorKind};
