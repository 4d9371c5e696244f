//! HTTP transport used by the address lookup.
//!
//! The lookup pipeline only needs "perform a GET and tell me what happened".
//! [`Transport`] captures that contract so the pipeline can run against the
//! real [`ReqwestTransport`] or against a test double.

mod http;

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use crate::error_handling::TransportError;

pub use http::ReqwestTransport;

/// Per-request transport options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Bound on the whole request, connection setup included
    pub timeout: Duration,
    /// PEM bundle of trust anchors; `None` uses the builtin roots
    pub ca_bundle_path: Option<PathBuf>,
    /// Negotiate HTTP/2 when the server supports it
    pub http2: bool,
}

/// Everything the transport observed while performing a request.
///
/// Counters and transcript are filled in as far as the request got, so a
/// failed request still reports what it cost.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportResponse {
    /// HTTP status code, 0 when no response was received
    pub status_code: u16,
    /// Response body
    pub body: Vec<u8>,
    /// Bytes written to the network
    pub bytes_sent: u64,
    /// Bytes read from the network
    pub bytes_received: u64,
    /// Diagnostic lines describing the exchange
    pub transcript: Vec<String>,
    /// Transport-level failure, if any
    pub error: Option<TransportError>,
}

/// Performs HTTP GET requests.
pub trait Transport: Send + Sync {
    /// Performs a GET of `url` and reports the outcome.
    ///
    /// Never fails: transport errors are reported in
    /// [`TransportResponse::error`].
    fn perform(
        &self,
        url: &str,
        options: &TransportOptions,
    ) -> impl Future<Output = TransportResponse> + Send;
}
