//! Lookup results.
//!
//! [`Results`] is assembled once per resolution through [`ResultsBuilder`] and
//! is read-only afterwards: its fields are private and the accessors borrow
//! from it.

use serde::Serialize;

use crate::error_handling::ErrorKind;

/// Formats an AS number as `AS<n>`, or `None` for the unknown ASN 0.
pub fn format_asn(asn_number: u32) -> Option<String> {
    (asn_number != 0).then(|| format!("AS{}", asn_number))
}

/// Outcome of one resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Results {
    address: String,
    country_code: String,
    asn_number: u32,
    asn_number_formatted: Option<String>,
    asn_org: String,
    bytes_sent: u64,
    bytes_received: u64,
    transcript: Vec<String>,
    error: Option<ErrorKind>,
    good: bool,
}

impl Results {
    /// The discovered probe address, empty if discovery failed.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Two-letter ISO country code, empty if unknown.
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// AS number, 0 if unknown.
    pub fn asn_number(&self) -> u32 {
        self.asn_number
    }

    /// AS number formatted as `AS<n>`, present iff the AS number is known.
    pub fn asn_number_formatted(&self) -> Option<&str> {
        self.asn_number_formatted.as_deref()
    }

    /// Name of the organization owning the AS, empty if unknown.
    pub fn asn_org(&self) -> &str {
        &self.asn_org
    }

    /// Bytes sent over the network during the resolution.
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// Bytes received over the network during the resolution.
    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    /// Diagnostic lines, in the order the steps ran.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// The transcript as newline-terminated text.
    pub fn transcript_text(&self) -> String {
        self.transcript.iter().fold(String::new(), |mut text, line| {
            text.push_str(line);
            text.push('\n');
            text
        })
    }

    /// The first hard failure of the resolution, if any.
    ///
    /// `None` does not mean every field was resolved; use [`Results::good`].
    pub fn error(&self) -> Option<ErrorKind> {
        self.error
    }

    /// Whether address, country code, ASN and organization are all known.
    pub fn good(&self) -> bool {
        self.good
    }
}

/// Accumulates the outcome of each stage into a [`Results`].
#[derive(Debug, Clone, Default)]
pub struct ResultsBuilder {
    results: Results,
}

impl ResultsBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the probe address.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.results.address = address.into();
        self
    }

    /// Sets the country code.
    pub fn country_code(mut self, country_code: impl Into<String>) -> Self {
        self.results.country_code = country_code.into();
        self
    }

    /// Sets the AS number; the formatted form follows from it.
    pub fn asn_number(mut self, asn_number: u32) -> Self {
        self.results.asn_number = asn_number;
        self.results.asn_number_formatted = format_asn(asn_number);
        self
    }

    /// Sets the AS organization.
    pub fn asn_org(mut self, asn_org: impl Into<String>) -> Self {
        self.results.asn_org = asn_org.into();
        self
    }

    /// Adds to the network byte counters.
    pub fn add_bytes(mut self, sent: u64, received: u64) -> Self {
        self.results.bytes_sent += sent;
        self.results.bytes_received += received;
        self
    }

    /// Appends transcript lines.
    pub fn transcript<I>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.results.transcript.extend(lines);
        self
    }

    /// Records a failure unless an earlier one was already recorded.
    pub fn error(mut self, error: Option<ErrorKind>) -> Self {
        if self.results.error.is_none() {
            self.results.error = error;
        }
        self
    }

    /// Freezes the results.
    pub fn build(self) -> Results {
        let mut results = self.results;
        results.good = !results.address.is_empty()
            && results.asn_number_formatted.is_some()
            && !results.asn_org.is_empty()
            && !results.country_code.is_empty();
        results
    }
}
