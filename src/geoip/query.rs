//! Field queries against a geo-database.
//!
//! Every query opens the database, resolves one address, projects the
//! requested fields and closes the database again. Nothing is cached between
//! queries.

use std::path::Path;

use super::database::{Database, DatabaseReader};
use super::types::{Field, FieldType, FieldValue};
use super::value::DataValue;
use crate::error_handling::{DatabaseError, ErrorKind};

/// Outcome of one field query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOutcome {
    /// The projected value, when the query succeeded
    pub value: Option<FieldValue>,
    /// Why the query failed
    pub error: Option<ErrorKind>,
    /// Diagnostic lines describing the query
    pub transcript: Vec<String>,
}

impl FieldOutcome {
    fn failed(mut self, error: ErrorKind, line: String) -> Self {
        self.error = Some(error);
        self.transcript.push(line);
        self
    }
}

/// Query facade over a [`Database`] backend.
#[derive(Debug, Clone, Copy)]
pub struct GeoDatabase<'a, D> {
    database: &'a D,
}

impl<'a, D: Database> GeoDatabase<'a, D> {
    /// Creates a facade over `database`.
    pub fn new(database: &'a D) -> Self {
        Self { database }
    }

    /// Looks `address` up in the database at `db_path` and projects `field`.
    ///
    /// The database handle lives only for the duration of this call.
    pub fn query(&self, db_path: Option<&Path>, address: &str, field: &Field) -> FieldOutcome {
        self.query_fields(db_path, address, std::slice::from_ref(field))
            .into_iter()
            .next()
            .unwrap_or_default()
    }

    /// Looks `address` up once and projects every field of `fields`.
    ///
    /// Returns one outcome per field, in order. Open and lookup failures are
    /// reported on every field; projection failures only on the field
    /// concerned. The database handle lives only for the duration of this
    /// call.
    pub fn query_fields(
        &self,
        db_path: Option<&Path>,
        address: &str,
        fields: &[Field],
    ) -> Vec<FieldOutcome> {
        let fail_all = |error: ErrorKind, describe: &dyn Fn(&Field) -> String| {
            fields
                .iter()
                .map(|field| FieldOutcome::default().failed(error, describe(field)))
                .collect::<Vec<_>>()
        };

        let opened = match db_path {
            Some(path) => self.database.open(path),
            None => Err(DatabaseError::NotConfigured),
        };
        let reader = match opened {
            Ok(reader) => reader,
            Err(e) => {
                return fail_all(ErrorKind::from(&e), &|field: &Field| {
                    format!("Failed to open database for {}: {}", field.name, e)
                })
            }
        };
        let opened_line = reader
            .metadata()
            .map(|metadata| format!("Opened database: {}", metadata));

        let mut outcomes: Vec<FieldOutcome> = match reader.lookup(address) {
            Ok(Some(entry)) => fields.iter().map(|field| project(&entry, field)).collect(),
            Ok(None) => fail_all(ErrorKind::NotFound, &|field: &Field| {
                format!("No database entry for {} ({})", address, field.name)
            }),
            Err(e) => fail_all(ErrorKind::from(&e), &|field: &Field| {
                format!("Database lookup failed for {}: {}", field.name, e)
            }),
        };

        if let (Some(line), Some(first)) = (opened_line, outcomes.first_mut()) {
            first.transcript.insert(0, line);
        }
        outcomes
    }

    /// Queries a string field. See [`GeoDatabase::query`].
    pub fn query_string(
        &self,
        db_path: Option<&Path>,
        address: &str,
        name: &'static str,
        path: &'static [&'static str],
    ) -> (Option<String>, FieldOutcome) {
        let field = Field {
            name,
            path,
            field_type: FieldType::Utf8String,
        };
        let outcome = self.query(db_path, address, &field);
        let value = outcome
            .value
            .as_ref()
            .and_then(FieldValue::as_str)
            .map(str::to_string);
        (value, outcome)
    }

    /// Queries an unsigned 32-bit integer field. See [`GeoDatabase::query`].
    pub fn query_u32(
        &self,
        db_path: Option<&Path>,
        address: &str,
        name: &'static str,
        path: &'static [&'static str],
    ) -> (Option<u32>, FieldOutcome) {
        let field = Field {
            name,
            path,
            field_type: FieldType::Uint32,
        };
        let outcome = self.query(db_path, address, &field);
        let value = outcome.value.as_ref().and_then(FieldValue::as_u32);
        (value, outcome)
    }
}

/// Projects `field` out of a database entry.
fn project(entry: &DataValue, field: &Field) -> FieldOutcome {
    let outcome = FieldOutcome::default();
    let Some(data) = entry.get_path(field.path) else {
        return outcome.failed(
            ErrorKind::FieldMissing,
            format!("No data for {} at {}", field.name, field.path.join(".")),
        );
    };

    match FieldValue::from_data(data, field.field_type) {
        Some(value) => FieldOutcome {
            transcript: vec![format!("{}: {}", field.name, value)],
            value: Some(value),
            error: None,
        },
        None => outcome.failed(
            ErrorKind::TypeMismatch,
            format!(
                "Unexpected type for {}: expected {}, found {}",
                field.name,
                field.field_type.data_type(),
                data.data_type()
            ),
        ),
    }
}
