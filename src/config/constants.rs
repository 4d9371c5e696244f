//! Configuration constants.
//!
//! This module defines the constants used as defaults throughout the probe:
//! the lookup endpoint, timeouts, and size limits.

use std::time::Duration;

/// IP-echo endpoint queried to discover the probe's public address.
///
/// The service answers with a small XML document whose `<Ip>` element carries
/// the caller's address as seen from the outside.
pub const IP_LOOKUP_URL: &str = "https://geoip.ubuntu.com/lookup";

/// Default timeout for the address lookup request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default timeout for the address lookup request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

/// User-Agent sent with the address lookup request.
pub const DEFAULT_USER_AGENT: &str = concat!("geoprobe/", env!("CARGO_PKG_VERSION"));

/// Upper bound on the lookup response body we are willing to buffer.
///
/// The real response is a few hundred bytes; anything close to this limit is
/// not an IP-echo answer.
pub const MAX_RESPONSE_BODY_SIZE: usize = 64 * 1024;

/// Environment variable holding the country database path.
pub const COUNTRY_DB_ENV: &str = "GEOPROBE_COUNTRY_DB";

/// Environment variable holding the ASN database path.
pub const ASN_DB_ENV: &str = "GEOPROBE_ASN_DB";

/// Environment variable holding the CA bundle path.
pub const CA_BUNDLE_ENV: &str = "GEOPROBE_CA_BUNDLE";

/// Field path of the country ISO code inside a country database record.
pub const COUNTRY_ISO_CODE_PATH: &[&str] = &["registered_country", "iso_code"];

/// Field path of the AS number inside an ASN database record.
pub const ASN_NUMBER_PATH: &[&str] = &["autonomous_system_number"];

/// Field path of the AS organization inside an ASN database record.
pub const ASN_ORG_PATH: &[&str] = &["autonomous_system_organization"];
