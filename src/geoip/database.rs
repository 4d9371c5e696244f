//! Geo-database backends.
//!
//! [`Database`] opens databases by path and [`DatabaseReader`] resolves
//! addresses into typed records. [`MmdbDatabase`] implements both on top of
//! the `maxminddb` crate.

use std::io::Read;
use std::net::IpAddr;
use std::path::Path;

use maxminddb::Reader;

use super::types::DatabaseMetadata;
use super::value::DataValue;
use crate::error_handling::DatabaseError;

/// Opens geo-databases.
pub trait Database: Send + Sync {
    /// Handle to an opened database. Dropping it closes the database.
    type Reader: DatabaseReader;

    /// Opens the database stored at `path`.
    fn open(&self, path: &Path) -> Result<Self::Reader, DatabaseError>;
}

/// Looks addresses up in an opened database.
pub trait DatabaseReader {
    /// Resolves `address` into the record stored for it.
    ///
    /// Returns `Ok(None)` when the database is valid but has no entry for the
    /// address, and an error when the lookup itself cannot be performed.
    fn lookup(&self, address: &str) -> Result<Option<DataValue>, DatabaseError>;

    /// Describes the opened database, when the backend knows.
    fn metadata(&self) -> Option<DatabaseMetadata> {
        None
    }
}

/// MaxMind DB (.mmdb) backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct MmdbDatabase;

/// An opened MaxMind DB file, held in memory.
pub struct MmdbReader {
    reader: Reader<Vec<u8>>,
}

impl MmdbDatabase {
    /// Creates a new backend.
    pub fn new() -> Self {
        Self
    }
}

impl Database for MmdbDatabase {
    type Reader = MmdbReader;

    fn open(&self, path: &Path) -> Result<MmdbReader, DatabaseError> {
        let open_error = |reason: String| DatabaseError::Open {
            path: path.display().to_string(),
            reason,
        };

        let mut file = std::fs::File::open(path).map_err(|e| open_error(e.to_string()))?;
        let size = file
            .metadata()
            .map_err(|e| open_error(e.to_string()))?
            .len();

        let mut bytes = Vec::new();
        bytes.try_reserve_exact(size as usize).map_err(|e| {
            DatabaseError::OutOfMemory(format!("{} ({} bytes): {}", path.display(), size, e))
        })?;
        file.read_to_end(&mut bytes)
            .map_err(|e| open_error(e.to_string()))?;

        let reader = Reader::from_source(bytes).map_err(|e| open_error(e.to_string()))?;
        log::debug!(
            "GeoIP database {} loaded: {} (build {})",
            path.display(),
            reader.metadata.database_type,
            reader.metadata.build_epoch
        );
        Ok(MmdbReader { reader })
    }
}

impl DatabaseReader for MmdbReader {
    fn lookup(&self, address: &str) -> Result<Option<DataValue>, DatabaseError> {
        let lookup_error = |reason: String| DatabaseError::Lookup {
            address: address.to_string(),
            reason,
        };

        let ip: IpAddr = address
            .parse()
            .map_err(|e: std::net::AddrParseError| lookup_error(e.to_string()))?;

        // maxminddb 0.27: lookup() succeeds for unknown addresses and reports
        // them through has_data()
        let result = self
            .reader
            .lookup(ip)
            .map_err(|e| lookup_error(e.to_string()))?;
        if !result.has_data() {
            return Ok(None);
        }

        result
            .decode::<DataValue>()
            .map_err(|e| lookup_error(e.to_string()))
    }

    fn metadata(&self) -> Option<DatabaseMetadata> {
        Some(DatabaseMetadata {
            database_type: self.reader.metadata.database_type.clone(),
            build_epoch: self.reader.metadata.build_epoch,
            ip_version: self.reader.metadata.ip_version,
        })
    }
}
