//! GeoIP lookup using MaxMind databases.
//!
//! This module provides the country and ASN lookups of the probe address:
//! - [`Database`] / [`DatabaseReader`]: the backend contract, implemented for
//!   `.mmdb` files by [`MmdbDatabase`]
//! - [`DataValue`]: typed record trees returned by a backend
//! - [`GeoDatabase`]: single-field queries with precise failure classification

mod database;
mod query;
mod types;
mod value;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export public API
pub use database::{Database, DatabaseReader, MmdbDatabase, MmdbReader};
pub use query::{FieldOutcome, GeoDatabase};
pub use types::{DatabaseMetadata, Field, FieldType, FieldValue};
pub use value::{DataType, DataValue};

use crate::config::{ASN_NUMBER_PATH, ASN_ORG_PATH, COUNTRY_ISO_CODE_PATH};

/// Country ISO code, read from the country database.
pub const COUNTRY_CODE_FIELD: Field = Field {
    name: "Probe CC",
    path: COUNTRY_ISO_CODE_PATH,
    field_type: FieldType::Utf8String,
};

/// Autonomous system number, read from the ASN database.
pub const ASN_NUMBER_FIELD: Field = Field {
    name: "Probe ASN",
    path: ASN_NUMBER_PATH,
    field_type: FieldType::Uint32,
};

/// Autonomous system organization, read from the ASN database.
pub const ASN_ORG_FIELD: Field = Field {
    name: "Probe Network Name",
    path: ASN_ORG_PATH,
    field_type: FieldType::Utf8String,
};
