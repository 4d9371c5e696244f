//! Address discovery over real HTTP against a local test server.

mod helpers;

use std::time::Duration;

use httptest::{matchers::*, responders::*, Expectation, Server};

use geoprobe::{AddressProbe, ErrorKind, ReqwestTransport, Resolver, Settings};
use helpers::{MockDatabase, ASN_DB, COUNTRY_DB};

#[tokio::test]
async fn test_probe_over_http() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/lookup")).respond_with(
            status_code(200)
                .insert_header("Content-Type", "text/xml")
                .body("<Response><Ip>8.8.8.8</Ip><Status>OK</Status></Response>"),
        ),
    );

    let transport = ReqwestTransport::new();
    let url = server.url("/lookup").to_string();
    let outcome = AddressProbe::with_url(&transport, &url)
        .fetch(Duration::from_secs(5), None)
        .await;

    assert_eq!(outcome.address.as_deref(), Some("8.8.8.8"));
    assert_eq!(outcome.error, None);
    assert!(outcome.bytes_sent > 0);
    assert!(outcome.bytes_received > 0);
    assert_eq!(
        outcome.transcript.last().map(String::as_str),
        Some("Successfully parsed IP: 8.8.8.8")
    );
}

#[tokio::test]
async fn test_probe_http_error_status() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/lookup"))
            .respond_with(status_code(404).body("<Ip>8.8.8.8</Ip>")),
    );

    let transport = ReqwestTransport::new();
    let url = server.url("/lookup").to_string();
    let outcome = AddressProbe::with_url(&transport, &url)
        .fetch(Duration::from_secs(5), None)
        .await;

    assert_eq!(outcome.address, None);
    assert_eq!(outcome.error, Some(ErrorKind::Http));
    assert!(outcome.bytes_received > 0);
}

#[tokio::test]
async fn test_probe_timeout() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/lookup"))
            .respond_with(delay_and_then(Duration::from_secs(3), status_code(200))),
    );

    let transport = ReqwestTransport::new();
    let url = server.url("/lookup").to_string();
    let outcome = AddressProbe::with_url(&transport, &url)
        .fetch(Duration::from_millis(200), None)
        .await;

    assert_eq!(outcome.error, Some(ErrorKind::Transport));
    assert!(outcome.transcript.iter().any(|line| line.contains("timeout")));
}

#[tokio::test]
async fn test_resolve_over_http() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/lookup"))
            .times(2)
            .respond_with(status_code(200).body("<Response><Ip>8.8.8.8</Ip></Response>")),
    );

    let resolver = Resolver::with_collaborators(ReqwestTransport::new(), MockDatabase::google())
        .with_lookup_url(server.url("/lookup").to_string());
    let settings = Settings::default()
        .with_timeout(Duration::from_secs(5))
        .with_country_db_path(COUNTRY_DB)
        .with_asn_db_path(ASN_DB);

    let results = resolver.resolve(&settings).await;
    assert!(results.good(), "transcript: {:?}", results.transcript());
    assert_eq!(results.country_code(), "US");
    assert_eq!(results.asn_number_formatted(), Some("AS15169"));
    assert_eq!(results.asn_org(), "Google LLC");
    assert!(results.bytes_sent() > 0);

    let sequential = resolver
        .resolve(&settings.clone().with_concurrent_lookups(false))
        .await;
    assert_eq!(sequential.address(), results.address());
    assert_eq!(sequential.asn_org(), results.asn_org());
}

#[tokio::test]
async fn test_resolve_with_unreachable_service() {
    // Nothing listens on port 1
    let resolver = Resolver::with_collaborators(ReqwestTransport::new(), MockDatabase::google())
        .with_lookup_url("http://127.0.0.1:1/lookup");
    let settings = Settings::default()
        .with_timeout(Duration::from_secs(5))
        .with_country_db_path(COUNTRY_DB)
        .with_asn_db_path(ASN_DB);

    let results = resolver.resolve(&settings).await;
    assert_eq!(results.error(), Some(ErrorKind::Transport));
    assert_eq!(results.address(), "");
    assert!(!results.good());
}
