// Shared test doubles for the transport and database collaborators.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use geoprobe::{
    Database, DatabaseError, DatabaseReader, DataValue, Transport, TransportError,
    TransportErrorKind, TransportOptions, TransportResponse,
};

pub const COUNTRY_DB: &str = "/data/country.mmdb";
pub const ASN_DB: &str = "/data/asn.mmdb";

/// Transport returning a canned response and counting requests.
pub struct MockTransport {
    response: TransportResponse,
    pub requests: Arc<AtomicUsize>,
    pub last_options: Arc<Mutex<Option<TransportOptions>>>,
}

impl MockTransport {
    pub fn new(response: TransportResponse) -> Self {
        Self {
            response,
            requests: Arc::new(AtomicUsize::new(0)),
            last_options: Arc::new(Mutex::new(None)),
        }
    }

    /// A 200 response carrying `body`.
    pub fn ok(body: &str) -> Self {
        Self::new(TransportResponse {
            status_code: 200,
            body: body.as_bytes().to_vec(),
            bytes_sent: 128,
            bytes_received: 512,
            transcript: vec![
                "> GET /lookup HTTP/1.1".to_string(),
                "< HTTP/2.0 200 OK".to_string(),
            ],
            error: None,
        })
    }

    /// A response carrying a transport failure.
    #[allow(dead_code)] // Used by other test files
    pub fn failing(kind: TransportErrorKind) -> Self {
        Self::new(TransportResponse {
            bytes_sent: 64,
            transcript: vec!["> GET /lookup HTTP/1.1".to_string()],
            error: Some(TransportError::new(kind, "simulated failure")),
            ..Default::default()
        })
    }

    /// A response with the given status code.
    #[allow(dead_code)] // Used by other test files
    pub fn status(status_code: u16) -> Self {
        Self::new(TransportResponse {
            status_code,
            body: b"<Ip>8.8.8.8</Ip>".to_vec(),
            bytes_sent: 128,
            bytes_received: 256,
            ..Default::default()
        })
    }
}

impl Transport for MockTransport {
    async fn perform(&self, _url: &str, options: &TransportOptions) -> TransportResponse {
        self.requests.fetch_add(1, Ordering::SeqCst);
        *self.last_options.lock().unwrap() = Some(options.clone());
        self.response.clone()
    }
}

/// In-memory database backend keyed by path, then by address.
#[derive(Default)]
pub struct MockDatabase {
    files: HashMap<PathBuf, HashMap<String, DataValue>>,
    pub opened: Arc<AtomicUsize>,
    pub open_handles: Arc<AtomicUsize>,
}

impl MockDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or extends) a database file with an entry for `address`.
    pub fn with_entry(mut self, path: &str, address: &str, entry: DataValue) -> Self {
        self.files
            .entry(PathBuf::from(path))
            .or_default()
            .insert(address.to_string(), entry);
        self
    }

    /// Adds an empty database file.
    #[allow(dead_code)] // Used by other test files
    pub fn with_empty(mut self, path: &str) -> Self {
        self.files.entry(PathBuf::from(path)).or_default();
        self
    }

    /// Country and ASN databases knowing about 8.8.8.8.
    pub fn google() -> Self {
        Self::new()
            .with_entry(COUNTRY_DB, "8.8.8.8", country_entry(DataValue::from("US")))
            .with_entry(
                ASN_DB,
                "8.8.8.8",
                asn_entry(DataValue::from(15169u32), DataValue::from("Google LLC")),
            )
    }
}

pub struct MockReader {
    entries: HashMap<String, DataValue>,
    open_handles: Arc<AtomicUsize>,
}

impl Drop for MockReader {
    fn drop(&mut self) {
        self.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Database for MockDatabase {
    type Reader = MockReader;

    fn open(&self, path: &Path) -> Result<MockReader, DatabaseError> {
        let entries = self
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| DatabaseError::Open {
                path: path.display().to_string(),
                reason: "No such file or directory".to_string(),
            })?;
        self.opened.fetch_add(1, Ordering::SeqCst);
        self.open_handles.fetch_add(1, Ordering::SeqCst);
        Ok(MockReader {
            entries,
            open_handles: Arc::clone(&self.open_handles),
        })
    }
}

impl DatabaseReader for MockReader {
    fn lookup(&self, address: &str) -> Result<Option<DataValue>, DatabaseError> {
        if address.parse::<std::net::IpAddr>().is_err() {
            return Err(DatabaseError::Lookup {
                address: address.to_string(),
                reason: "invalid IP address syntax".to_string(),
            });
        }
        Ok(self.entries.get(address).cloned())
    }
}

/// A country record with `iso_code` under `registered_country`.
pub fn country_entry(iso_code: DataValue) -> DataValue {
    DataValue::map([(
        "registered_country",
        DataValue::map([("iso_code", iso_code)]),
    )])
}

/// An ASN record.
pub fn asn_entry(number: DataValue, organization: DataValue) -> DataValue {
    DataValue::map([
        ("autonomous_system_number", number),
        ("autonomous_system_organization", organization),
    ])
}
