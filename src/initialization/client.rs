//! HTTP client initialization.
//!
//! This module builds the `reqwest` client used by the address lookup from the
//! per-request [`TransportOptions`].

use reqwest::{Certificate, ClientBuilder};

use crate::config::DEFAULT_USER_AGENT;
use crate::error_handling::{TransportError, TransportErrorKind};
use crate::transport::TransportOptions;

/// Builds an HTTP client for one lookup request.
///
/// The client is configured with:
/// - Timeout from the options
/// - Rustls TLS backend
/// - HTTP/2 negotiated via ALPN, or HTTP/1.1 only when `http2` is off
/// - When a CA bundle is given, only the certificates from that bundle as roots.
///   An empty bundle path means the builtin roots.
///
/// # Errors
///
/// Returns a `TransportErrorKind::Builder` error if the CA bundle cannot be read
/// or parsed, or if the TLS backend cannot be initialized.
pub fn init_client(options: &TransportOptions) -> Result<reqwest::Client, TransportError> {
    let mut builder = ClientBuilder::new()
        .use_rustls_tls()
        .timeout(options.timeout)
        .user_agent(DEFAULT_USER_AGENT);

    if !options.http2 {
        builder = builder.http1_only();
    }

    let ca_bundle_path = options
        .ca_bundle_path
        .as_deref()
        .filter(|path| !path.as_os_str().is_empty());
    if let Some(path) = ca_bundle_path {
        let pem = std::fs::read(path).map_err(|e| {
            TransportError::new(
                TransportErrorKind::Builder,
                format!("cannot read CA bundle {}: {}", path.display(), e),
            )
        })?;
        let certificates = Certificate::from_pem_bundle(&pem).map_err(|e| {
            TransportError::new(
                TransportErrorKind::Builder,
                format!("cannot parse CA bundle {}: {}", path.display(), e),
            )
        })?;
        if certificates.is_empty() {
            return Err(TransportError::new(
                TransportErrorKind::Builder,
                format!("CA bundle {} contains no certificates", path.display()),
            ));
        }
        log::debug!(
            "Using {} CA certificate(s) from {}",
            certificates.len(),
            path.display()
        );
        builder = builder.tls_built_in_root_certs(false);
        for certificate in certificates {
            builder = builder.add_root_certificate(certificate);
        }
    }

    builder
        .build()
        .map_err(|e| TransportError::new(TransportErrorKind::Builder, e.to_string()))
}
