//! User-facing rendering of [`Results`].

use std::fmt::Write;

use crate::models::Results;

/// Renders the summary block followed by the lookup transcript.
///
/// ```text
/// === BEGIN SUMMARY ===
/// Error: none
/// Probe IP: 8.8.8.8
/// ...
/// === END SUMMARY ===
/// === BEGIN LOGS ===
/// ...
/// === END LOGS ===
/// ```
pub fn render_summary(results: &Results) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "=== BEGIN SUMMARY ===");
    let _ = writeln!(
        out,
        "Error: {}",
        results.error().map(|e| e.as_str()).unwrap_or("none")
    );
    let _ = writeln!(out, "Good: {}", results.good());
    let _ = writeln!(out, "Probe IP: {}", results.address());
    let _ = writeln!(
        out,
        "Probe ASN: {}",
        results.asn_number_formatted().unwrap_or("")
    );
    let _ = writeln!(out, "Probe CC: {}", results.country_code());
    let _ = writeln!(out, "Probe Network Name: {}", results.asn_org());
    let _ = writeln!(out, "Bytes sent: {}", results.bytes_sent());
    let _ = writeln!(out, "Bytes recv: {}", results.bytes_received());
    let _ = writeln!(out, "=== END SUMMARY ===");
    let _ = writeln!(out, "=== BEGIN LOGS ===");
    out.push_str(&results.transcript_text());
    let _ = writeln!(out, "=== END LOGS ===");
    out
}

/// Renders the results as a pretty-printed JSON document.
pub fn render_json(results: &Results) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(results)
}
