//! GeoIP data structures.
//!
//! This module defines the field projection types used by the query facade and
//! the metadata reported about an opened database.

use super::value::{DataType, DataValue};

/// Primitive type a projected field is expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A UTF-8 string
    Utf8String,
    /// An unsigned 32-bit integer
    Uint32,
}

impl FieldType {
    /// The database data type matching this field type.
    pub fn data_type(&self) -> DataType {
        match self {
            FieldType::Utf8String => DataType::Utf8String,
            FieldType::Uint32 => DataType::Uint32,
        }
    }
}

/// A field to project out of a database entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Human-readable name used in the transcript
    pub name: &'static str,
    /// Path of map keys (or array indices) leading to the value
    pub path: &'static [&'static str],
    /// Expected primitive type
    pub field_type: FieldType,
}

/// A projected field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A string value
    Utf8String(String),
    /// An unsigned 32-bit integer value
    Uint32(u32),
}

impl FieldValue {
    /// Converts a database value, if it has the expected type.
    pub(crate) fn from_data(value: &DataValue, expected: FieldType) -> Option<Self> {
        match (value, expected) {
            (DataValue::Utf8String(s), FieldType::Utf8String) => {
                Some(FieldValue::Utf8String(s.clone()))
            }
            (DataValue::Uint32(n), FieldType::Uint32) => Some(FieldValue::Uint32(*n)),
            _ => None,
        }
    }

    /// The string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Utf8String(s) => Some(s),
            FieldValue::Uint32(_) => None,
        }
    }

    /// The integer value, if this is an integer.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            FieldValue::Uint32(n) => Some(*n),
            FieldValue::Utf8String(_) => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Utf8String(s) => f.write_str(s),
            FieldValue::Uint32(n) => write!(f, "{}", n),
        }
    }
}

/// Metadata about an opened database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseMetadata {
    /// Database type, e.g. "GeoLite2-ASN"
    pub database_type: String,
    /// Build time as seconds since the epoch
    pub build_epoch: u64,
    /// 4 for IPv4-only databases, 6 when IPv6 is supported
    pub ip_version: u16,
}

impl std::fmt::Display for DatabaseMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let built = chrono::DateTime::from_timestamp(self.build_epoch as i64, 0)
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| format!("epoch {}", self.build_epoch));
        write!(
            f,
            "{} (IPv{}, built {})",
            self.database_type, self.ip_version, built
        )
    }
}
