//! geoprobe library: discovery of the probe's network identity
//!
//! This library discovers the public IP address of the machine it runs on by
//! querying an IP-echo service, then resolves that address into an ISO country
//! code, an autonomous system number and the AS organization using two local
//! MaxMind databases.
//!
//! # Example
//!
//! ```no_run
//! use geoprobe::{resolve, Settings};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let settings = Settings::default()
//!     .with_country_db_path("GeoLite2-Country.mmdb")
//!     .with_asn_db_path("GeoLite2-ASN.mmdb");
//!
//! let results = resolve(&settings).await;
//! if results.good() {
//!     println!(
//!         "{} {} {} {}",
//!         results.address(),
//!         results.country_code(),
//!         results.asn_number_formatted().unwrap_or_default(),
//!         results.asn_org()
//!     );
//! }
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod config;
pub mod error_handling;
pub mod geoip;
pub mod initialization;
pub mod models;
pub mod probe;
pub mod report;
pub mod resolver;
pub mod transport;

// Re-export public API
pub use config::{LogFormat, LogLevel, OutputFormat, Settings};
pub use error_handling::{DatabaseError, ErrorKind, TransportError, TransportErrorKind};
pub use geoip::{Database, DatabaseReader, DataType, DataValue, GeoDatabase, MmdbDatabase};
pub use models::{format_asn, Results, ResultsBuilder};
pub use probe::{AddressProbe, ProbeOutcome};
pub use resolver::{resolve, Resolver};
pub use transport::{ReqwestTransport, Transport, TransportOptions, TransportResponse};
