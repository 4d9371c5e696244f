//! `reqwest`-backed transport.

use std::error::Error as _;

use reqwest::Url;

use super::{Transport, TransportOptions, TransportResponse};
use crate::config::{DEFAULT_USER_AGENT, MAX_RESPONSE_BODY_SIZE};
use crate::error_handling::{TransportError, TransportErrorKind};
use crate::initialization::init_client;

/// Transport performing real HTTP requests with `reqwest`.
///
/// A fresh client is built for every request, since timeout and trust anchors
/// are per-request options and the probe only ever performs one request.
///
/// `reqwest` does not expose wire-level counters, so `bytes_sent` and
/// `bytes_received` are estimated from the serialized request head and from the
/// response head plus body bytes actually read.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestTransport;

impl ReqwestTransport {
    /// Creates a new transport.
    pub fn new() -> Self {
        Self
    }
}

impl Transport for ReqwestTransport {
    async fn perform(&self, url: &str, options: &TransportOptions) -> TransportResponse {
        let mut response = TransportResponse::default();

        let client = match init_client(options) {
            Ok(client) => client,
            Err(error) => return fail(response, error),
        };

        let url = match Url::parse(url) {
            Ok(url) => url,
            Err(e) => {
                return fail(
                    response,
                    TransportError::new(
                        TransportErrorKind::Builder,
                        format!("invalid URL {}: {}", url, e),
                    ),
                )
            }
        };

        let request_head = request_head(&url);
        response.bytes_sent = head_size(&request_head);
        response
            .transcript
            .extend(request_head.iter().map(|line| format!("> {}", line)));

        let mut reply = match client.get(url).send().await {
            Ok(reply) => reply,
            Err(e) => return fail(response, categorize_reqwest_error(&e)),
        };

        let status_line = format!("{:?} {}", reply.version(), reply.status());
        response.status_code = reply.status().as_u16();
        response.bytes_received += status_line.len() as u64 + 4;
        response.transcript.push(format!("< {}", status_line));
        for (name, value) in reply.headers() {
            response.bytes_received += (name.as_str().len() + value.len() + 4) as u64;
            response.transcript.push(format!(
                "< {}: {}",
                name,
                value.to_str().unwrap_or("<non-ascii>")
            ));
        }

        let mut body = Vec::new();
        if let Some(length) = reply.content_length() {
            if length > MAX_RESPONSE_BODY_SIZE as u64 {
                return fail(response, body_too_large(length));
            }
            if let Err(e) = body.try_reserve_exact(length as usize) {
                return fail(
                    response,
                    TransportError::new(TransportErrorKind::OutOfMemory, e.to_string()),
                );
            }
        }

        loop {
            match reply.chunk().await {
                Ok(Some(chunk)) => {
                    response.bytes_received += chunk.len() as u64;
                    let total = body.len() + chunk.len();
                    if total > MAX_RESPONSE_BODY_SIZE {
                        return fail(response, body_too_large(total as u64));
                    }
                    if let Err(e) = body.try_reserve(chunk.len()) {
                        return fail(
                            response,
                            TransportError::new(TransportErrorKind::OutOfMemory, e.to_string()),
                        );
                    }
                    body.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => return fail(response, categorize_reqwest_error(&e)),
            }
        }

        response
            .transcript
            .push(format!("* Received {} body bytes", body.len()));
        response.body = body;
        response
    }
}

/// Records `error` in the transcript and in the response.
fn fail(mut response: TransportResponse, error: TransportError) -> TransportResponse {
    log::debug!("HTTP request failed: {}", error);
    response.transcript.push(format!("* {}", error));
    response.error = Some(error);
    response
}

fn body_too_large(size: u64) -> TransportError {
    TransportError::new(
        TransportErrorKind::Body,
        format!(
            "response body too large ({} bytes, max {})",
            size, MAX_RESPONSE_BODY_SIZE
        ),
    )
}

/// Request line and default headers as the client sends them.
fn request_head(url: &Url) -> Vec<String> {
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }
    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };
    vec![
        format!("GET {} HTTP/1.1", target),
        format!("host: {}", host),
        format!("user-agent: {}", DEFAULT_USER_AGENT),
        "accept: */*".to_string(),
    ]
}

/// Size of a serialized HTTP head: CRLF after every line plus the blank line.
fn head_size(lines: &[String]) -> u64 {
    lines.iter().map(|line| line.len() as u64 + 2).sum::<u64>() + 2
}

/// Categorizes a `reqwest::Error` into a [`TransportError`].
///
/// The message carries the whole source chain, since the top-level reqwest
/// message ("error sending request") rarely says what actually failed.
pub(crate) fn categorize_reqwest_error(error: &reqwest::Error) -> TransportError {
    let kind = if error.is_timeout() {
        TransportErrorKind::Timeout
    } else if error.is_connect() {
        TransportErrorKind::Connect
    } else if error.is_builder() {
        TransportErrorKind::Builder
    } else if error.is_body() || error.is_decode() {
        TransportErrorKind::Body
    } else {
        TransportErrorKind::Request
    };

    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    TransportError::new(kind, message)
}
