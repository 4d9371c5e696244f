//! The resolution pipeline.
//!
//! [`Resolver`] discovers the probe address and then runs the country and ASN
//! database stages, folding every stage outcome into one [`Results`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinError;

use crate::config::{Settings, IP_LOOKUP_URL};
use crate::geoip::{
    Database, FieldOutcome, FieldValue, GeoDatabase, MmdbDatabase, ASN_NUMBER_FIELD,
    ASN_ORG_FIELD, COUNTRY_CODE_FIELD,
};
use crate::models::{Results, ResultsBuilder};
use crate::probe::AddressProbe;
use crate::transport::{ReqwestTransport, Transport};

/// Outcome of the country stage.
#[derive(Debug, Default)]
struct CountryStage {
    country_code: FieldOutcome,
}

/// Outcome of the ASN stage. Both fields come from one lookup but are
/// projected independently.
#[derive(Debug, Default)]
struct AsnStage {
    number: FieldOutcome,
    org: FieldOutcome,
}

fn run_country_stage<D: Database>(database: &D, db_path: Option<&Path>, address: &str) -> CountryStage {
    let facade = GeoDatabase::new(database);
    CountryStage {
        country_code: facade.query(db_path, address, &COUNTRY_CODE_FIELD),
    }
}

fn run_asn_stage<D: Database>(database: &D, db_path: Option<&Path>, address: &str) -> AsnStage {
    let mut outcomes = GeoDatabase::new(database)
        .query_fields(db_path, address, &[ASN_NUMBER_FIELD, ASN_ORG_FIELD])
        .into_iter();
    AsnStage {
        number: outcomes.next().unwrap_or_default(),
        org: outcomes.next().unwrap_or_default(),
    }
}

/// Resolves the probe's network identity.
///
/// The transport and database backends are injected so tests can replace
/// them. Use [`Resolver::new`] for the production backends.
pub struct Resolver<T = ReqwestTransport, D = MmdbDatabase> {
    transport: T,
    database: Arc<D>,
    lookup_url: String,
}

impl Resolver {
    /// Creates a resolver using reqwest and MaxMind DB files.
    pub fn new() -> Self {
        Self::with_collaborators(ReqwestTransport::new(), MmdbDatabase::new())
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, D> Resolver<T, D>
where
    T: Transport,
    D: Database + 'static,
{
    /// Creates a resolver with custom backends.
    pub fn with_collaborators(transport: T, database: D) -> Self {
        Self {
            transport,
            database: Arc::new(database),
            lookup_url: IP_LOOKUP_URL.to_string(),
        }
    }

    /// Overrides the address lookup service.
    pub fn with_lookup_url(mut self, url: impl Into<String>) -> Self {
        self.lookup_url = url.into();
        self
    }

    /// Runs the full pipeline.
    ///
    /// Never fails: every stage failure is recorded in the returned
    /// [`Results`]. Check [`Results::good`] to decide whether the resolution
    /// succeeded.
    pub async fn resolve(&self, settings: &Settings) -> Results {
        let probe = AddressProbe::with_url(&self.transport, &self.lookup_url)
            .fetch(settings.timeout, settings.ca_bundle_path.as_deref())
            .await;

        let mut builder = ResultsBuilder::new()
            .add_bytes(probe.bytes_sent, probe.bytes_received)
            .transcript(probe.transcript)
            .error(probe.error);

        if let Some(address) = probe.address {
            let (country, asn) = if settings.concurrent_lookups {
                self.run_stages_concurrently(settings, &address).await
            } else {
                (
                    run_country_stage(
                        self.database.as_ref(),
                        settings.country_db_path.as_deref(),
                        &address,
                    ),
                    run_asn_stage(
                        self.database.as_ref(),
                        settings.asn_db_path.as_deref(),
                        &address,
                    ),
                )
            };
            builder = fold_country(builder.address(address), country);
            builder = fold_asn(builder, asn);
        } else {
            log::warn!("Probe address unavailable, skipping database lookups");
        }

        let results = builder.build();
        for line in results.transcript() {
            log::debug!("{}", line);
        }
        log::info!(
            "Resolution finished: good={} error={}",
            results.good(),
            results
                .error()
                .map(|e| e.as_str())
                .unwrap_or("none")
        );
        results
    }

    async fn run_stages_concurrently(
        &self,
        settings: &Settings,
        address: &str,
    ) -> (CountryStage, AsnStage) {
        let country = spawn_stage(
            Arc::clone(&self.database),
            settings.country_db_path.clone(),
            address.to_string(),
            run_country_stage::<D>,
        );
        let asn = spawn_stage(
            Arc::clone(&self.database),
            settings.asn_db_path.clone(),
            address.to_string(),
            run_asn_stage::<D>,
        );
        let (country, asn) = tokio::join!(country, asn);

        let country = country.unwrap_or_else(|e| CountryStage {
            country_code: stage_panicked("Country", &e),
        });
        let asn = asn.unwrap_or_else(|e| AsnStage {
            number: stage_panicked("ASN", &e),
            org: FieldOutcome::default(),
        });
        (country, asn)
    }
}

async fn spawn_stage<D, S>(
    database: Arc<D>,
    db_path: Option<PathBuf>,
    address: String,
    stage: fn(&D, Option<&Path>, &str) -> S,
) -> Result<S, JoinError>
where
    D: Database + 'static,
    S: Send + 'static,
{
    tokio::task::spawn_blocking(move || stage(database.as_ref(), db_path.as_deref(), &address))
        .await
}

fn stage_panicked(stage: &str, error: &JoinError) -> FieldOutcome {
    log::error!("{} lookup task failed: {}", stage, error);
    FieldOutcome {
        transcript: vec![format!("{} lookup task failed: {}", stage, error)],
        ..Default::default()
    }
}

fn fold_country(builder: ResultsBuilder, stage: CountryStage) -> ResultsBuilder {
    let CountryStage { country_code } = stage;
    let mut builder = builder
        .transcript(country_code.transcript)
        .error(country_code.error);
    if let Some(FieldValue::Utf8String(code)) = country_code.value {
        builder = builder.country_code(code);
    }
    builder
}

fn fold_asn(builder: ResultsBuilder, stage: AsnStage) -> ResultsBuilder {
    let AsnStage { number, org } = stage;
    let mut builder = builder
        .transcript(number.transcript)
        .error(number.error)
        .transcript(org.transcript)
        .error(org.error);
    if let Some(FieldValue::Uint32(n)) = number.value {
        builder = builder.asn_number(n);
    }
    if let Some(FieldValue::Utf8String(name)) = org.value {
        builder = builder.asn_org(name);
    }
    builder
}

/// Resolves the probe's network identity with the default backends.
///
/// Equivalent to `Resolver::new().resolve(settings)`.
pub async fn resolve(settings: &Settings) -> Results {
    Resolver::new().resolve(settings).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ErrorKind;
    use crate::geoip::test_helpers::{asn_record, country_record, write_mmdb};
    use crate::geoip::MmdbDatabase;
    use crate::transport::{TransportOptions, TransportResponse};

    struct StaticTransport(&'static str);

    impl Transport for StaticTransport {
        async fn perform(&self, _url: &str, _options: &TransportOptions) -> TransportResponse {
            TransportResponse {
                status_code: 200,
                body: self.0.as_bytes().to_vec(),
                bytes_sent: 10,
                bytes_received: 20,
                ..Default::default()
            }
        }
    }

    #[tokio::test]
    async fn test_unconfigured_databases() {
        let resolver =
            Resolver::with_collaborators(StaticTransport("<Ip>8.8.8.8</Ip>"), MmdbDatabase::new());
        let results = resolver.resolve(&Settings::default()).await;

        assert_eq!(results.address(), "8.8.8.8");
        assert_eq!(results.error(), Some(ErrorKind::DatabaseOpen));
        assert_eq!(results.country_code(), "");
        assert_eq!(results.asn_number(), 0);
        assert!(!results.good());
        assert_eq!(results.bytes_sent(), 10);
        assert_eq!(results.bytes_received(), 20);
        // probe line, country open, asn number open, asn org open
        assert_eq!(results.transcript().len(), 4);
    }

    #[tokio::test]
    async fn test_resolve_with_mmdb_files() {
        let country = write_mmdb("GeoLite2-Country", country_record());
        let asn = write_mmdb("GeoLite2-ASN", asn_record());
        let settings = Settings::default()
            .with_country_db_path(country.path())
            .with_asn_db_path(asn.path());
        let resolver =
            Resolver::with_collaborators(StaticTransport("<Ip>8.8.8.8</Ip>"), MmdbDatabase::new());

        for settings in [settings.clone(), settings.with_concurrent_lookups(false)] {
            let results = resolver.resolve(&settings).await;
            assert!(results.good(), "transcript: {:?}", results.transcript());
            assert_eq!(results.country_code(), "US");
            assert_eq!(results.asn_number(), 15169);
            assert_eq!(results.asn_org(), "Google LLC");
            assert_eq!(
                results.transcript()[1..],
                [
                    "Opened database: GeoLite2-Country (IPv4, built 2023-11-14)",
                    "Probe CC: US",
                    "Opened database: GeoLite2-ASN (IPv4, built 2023-11-14)",
                    "Probe ASN: 15169",
                    "Probe Network Name: Google LLC",
                ]
            );
        }
    }

    #[tokio::test]
    async fn test_parse_failure_skips_databases() {
        let resolver =
            Resolver::with_collaborators(StaticTransport("<Ip></Ip>"), MmdbDatabase::new());
        let results = resolver.resolve(&Settings::default()).await;

        assert_eq!(results.error(), Some(ErrorKind::Parse));
        assert_eq!(results.address(), "");
        assert_eq!(results.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_sequential_matches_concurrent() {
        let resolver =
            Resolver::with_collaborators(StaticTransport("<Ip>8.8.8.8</Ip>"), MmdbDatabase::new());
        let concurrent = resolver.resolve(&Settings::default()).await;
        let sequential = resolver
            .resolve(&Settings::default().with_concurrent_lookups(false))
            .await;
        assert_eq!(concurrent, sequential);
    }

    #[test]
    fn test_fold_asn_number_error_precedes_org_error() {
        let stage = AsnStage {
            number: FieldOutcome {
                error: Some(ErrorKind::TypeMismatch),
                ..Default::default()
            },
            org: FieldOutcome {
                error: Some(ErrorKind::FieldMissing),
                ..Default::default()
            },
        };
        let results = fold_asn(ResultsBuilder::new(), stage).build();
        assert_eq!(results.error(), Some(ErrorKind::TypeMismatch));
    }

    #[test]
    fn test_fold_asn_org_without_number() {
        let stage = AsnStage {
            number: FieldOutcome {
                error: Some(ErrorKind::FieldMissing),
                transcript: vec!["no number".into()],
                ..Default::default()
            },
            org: FieldOutcome {
                value: Some(FieldValue::Utf8String("Example Org".into())),
                transcript: vec!["org".into()],
                ..Default::default()
            },
        };
        let results = fold_asn(ResultsBuilder::new(), stage).build();
        assert_eq!(results.asn_org(), "Example Org");
        assert_eq!(results.asn_number_formatted(), None);
        assert_eq!(results.transcript(), ["no number", "org"]);
    }
}
