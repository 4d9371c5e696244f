//! Discovery of the probe's public IP address.
//!
//! [`AddressProbe`] asks an IP-echo service which address our request came
//! from. It performs exactly one request and never retries.

mod parse;

use std::path::Path;
use std::time::Duration;

use crate::config::IP_LOOKUP_URL;
use crate::error_handling::ErrorKind;
use crate::transport::{Transport, TransportOptions};

pub use parse::{parse_ip, ParseIpError};

/// Outcome of one address lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// The discovered address, if any
    pub address: Option<String>,
    /// Bytes sent by the transport
    pub bytes_sent: u64,
    /// Bytes received by the transport
    pub bytes_received: u64,
    /// Transport transcript followed by our own diagnostic lines
    pub transcript: Vec<String>,
    /// Failure that prevented discovering the address
    pub error: Option<ErrorKind>,
}

/// Fetches the probe address through a [`Transport`].
#[derive(Debug, Clone)]
pub struct AddressProbe<'a, T> {
    transport: &'a T,
    url: &'a str,
}

impl<'a, T: Transport> AddressProbe<'a, T> {
    /// Creates a probe querying the default lookup service.
    pub fn new(transport: &'a T) -> Self {
        Self::with_url(transport, IP_LOOKUP_URL)
    }

    /// Creates a probe querying a custom lookup service.
    pub fn with_url(transport: &'a T, url: &'a str) -> Self {
        Self { transport, url }
    }

    /// Performs the lookup request and extracts the address from the response.
    ///
    /// Byte counters and the transport transcript are always copied into the
    /// outcome, including when the request fails.
    pub async fn fetch(&self, timeout: Duration, ca_bundle_path: Option<&Path>) -> ProbeOutcome {
        let options = TransportOptions {
            timeout,
            ca_bundle_path: ca_bundle_path.map(Path::to_path_buf),
            http2: true,
        };

        log::debug!("Looking up probe IP via {}", self.url);
        let response = self.transport.perform(self.url, &options).await;

        let mut outcome = ProbeOutcome {
            address: None,
            bytes_sent: response.bytes_sent,
            bytes_received: response.bytes_received,
            transcript: response.transcript,
            error: None,
        };

        if let Some(error) = &response.error {
            outcome.error = Some(ErrorKind::from(error));
            outcome
                .transcript
                .push(format!("Failed to fetch probe IP from {}: {}", self.url, error));
            return outcome;
        }

        if response.status_code != 200 {
            outcome.error = Some(ErrorKind::Http);
            outcome.transcript.push(format!(
                "Unexpected HTTP status code from {}: {}",
                self.url, response.status_code
            ));
            return outcome;
        }

        let body = String::from_utf8_lossy(&response.body);
        match parse_ip(&body) {
            Ok(address) => {
                outcome
                    .transcript
                    .push(format!("Successfully parsed IP: {}", address));
                outcome.address = Some(address);
            }
            Err(e) => {
                outcome.error = Some(ErrorKind::Parse);
                outcome.transcript.push(format!("Failed to parse IP: {}", e));
            }
        }
        outcome
    }
}
