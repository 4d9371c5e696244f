//! Error type definitions.
//!
//! This module defines the outcome classification recorded in the lookup
//! results and the error types reported by the transport and database
//! collaborators.

use log::SetLoggerError;
use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Kinds of hard failure a lookup stage can record.
///
/// Only the first failure of a resolution is kept in the results; every
/// failure is still described in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Network or TLS failure while fetching the probe address
    Transport,
    /// The lookup endpoint answered with a status other than 200
    Http,
    /// The lookup response did not contain a well-formed `<Ip>` element
    Parse,
    /// A geo-database is not configured, missing, unreadable or invalid
    DatabaseOpen,
    /// The database could not resolve the address (e.g. malformed literal)
    AddressLookup,
    /// The address has no entry in the database
    NotFound,
    /// The entry has no data at the requested field path
    FieldMissing,
    /// The field exists but has an unexpected type
    TypeMismatch,
    /// An allocation failed
    OutOfMemory,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorKind {
    /// Returns a human-readable string representation of the error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport error",
            ErrorKind::Http => "HTTP error",
            ErrorKind::Parse => "parse error",
            ErrorKind::DatabaseOpen => "database open error",
            ErrorKind::AddressLookup => "address lookup error",
            ErrorKind::NotFound => "address not found",
            ErrorKind::FieldMissing => "field missing",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::OutOfMemory => "out of memory",
        }
    }
}

/// Categories of transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum TransportErrorKind {
    /// The client could not be configured (bad CA bundle, TLS backend setup)
    Builder,
    /// The request did not complete within the timeout
    Timeout,
    /// The connection could not be established
    Connect,
    /// Any other failure while sending the request
    Request,
    /// The response body could not be read
    Body,
    /// The response body could not be buffered
    OutOfMemory,
}

impl TransportErrorKind {
    /// Returns a human-readable string representation of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportErrorKind::Builder => "client setup error",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Connect => "connect error",
            TransportErrorKind::Request => "request error",
            TransportErrorKind::Body => "body error",
            TransportErrorKind::OutOfMemory => "out of memory",
        }
    }
}

/// Error reported by a [`crate::Transport`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: {message}", kind.as_str())]
pub struct TransportError {
    /// What went wrong
    pub kind: TransportErrorKind,
    /// Details for the transcript
    pub message: String,
}

impl TransportError {
    /// Creates a transport error of the given kind.
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&TransportError> for ErrorKind {
    fn from(error: &TransportError) -> Self {
        match error.kind {
            TransportErrorKind::OutOfMemory => ErrorKind::OutOfMemory,
            _ => ErrorKind::Transport,
        }
    }
}

/// Error types for geo-database operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatabaseError {
    /// No path was configured for the database.
    #[error("no database path configured")]
    NotConfigured,

    /// The database file could not be read or is not a valid database.
    #[error("cannot open database {path}: {reason}")]
    Open {
        /// Path that was opened
        path: String,
        /// Underlying cause
        reason: String,
    },

    /// The database could not resolve the address.
    #[error("cannot look up {address}: {reason}")]
    Lookup {
        /// Address that was looked up
        address: String,
        /// Underlying cause
        reason: String,
    },

    /// Memory for the database could not be allocated.
    #[error("out of memory: {0}")]
    OutOfMemory(String),
}

impl From<&DatabaseError> for ErrorKind {
    fn from(error: &DatabaseError) -> Self {
        match error {
            DatabaseError::NotConfigured | DatabaseError::Open { .. } => ErrorKind::DatabaseOpen,
            DatabaseError::Lookup { .. } => ErrorKind::AddressLookup,
            DatabaseError::OutOfMemory(_) => ErrorKind::OutOfMemory,
        }
    }
}
