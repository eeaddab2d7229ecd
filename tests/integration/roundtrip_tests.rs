use lexanchor::config::{FallbackPolicy, NotaryConfig};
use lexanchor::domain::Metadata;
use lexanchor::infrastructure::{EphemeralIdentityProvider, HttpLedgerClient, LedgerClient};
use lexanchor::{NotarizeError, NotaryService};

use crate::mock_server::MockLedgerServer;

fn meta(pairs: &[(&str, &str)]) -> Metadata {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect()
}

async fn service_against(server: &MockLedgerServer, fallback: FallbackPolicy) -> NotaryService {
    let url = server.start().await;
    let config = NotaryConfig {
        node_url: url.clone(),
        indexer_url: url,
        fallback,
        ..NotaryConfig::default()
    };
    NotaryService::from_config(config)
}

#[tokio::test]
async fn test_http_round_trip() {
    let server = MockLedgerServer::new();
    let svc = service_against(&server, FallbackPolicy::Simulate).await;

    let record = svc
        .notarize(
            b"Lease Agreement v1",
            meta(&[("documentName", "lease.txt"), ("userId", "u1")]),
        )
        .await
        .unwrap();

    assert!(!record.simulated);
    assert!(record.transaction_reference.starts_with("MOCKTX"));
    assert_eq!(record.ledger_position, 41_000_001);
    assert_eq!(server.transaction_count(), 1);

    let result = svc
        .verify(&record.transaction_reference, record.document_hash.as_str())
        .await
        .unwrap();

    assert!(result.verified);
    assert_eq!(result.observed_hash, Some(record.document_hash));
    assert_eq!(result.ledger_position, Some(41_000_001));
    assert_eq!(result.timestamp, Some(1_700_000_000));
    let metadata = result.metadata.unwrap();
    assert_eq!(metadata["documentName"], serde_json::json!("lease.txt"));
    assert!(metadata.contains_key("notarizedAt"));
}

#[tokio::test]
async fn test_http_tamper_detection() {
    let server = MockLedgerServer::new();
    let svc = service_against(&server, FallbackPolicy::Simulate).await;

    let record = svc
        .notarize(b"Lease Agreement v1", Metadata::new())
        .await
        .unwrap();

    let mut tampered = record.document_hash.as_str().to_string();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'f' { 'e' } else { 'f' });

    let result = svc
        .verify(&record.transaction_reference, &tampered)
        .await
        .unwrap();
    assert!(!result.verified);
    assert_eq!(result.observed_hash, Some(record.document_hash));
}

#[tokio::test]
async fn test_unknown_reference_maps_http_404_to_not_found() {
    let server = MockLedgerServer::new();
    let svc = service_against(&server, FallbackPolicy::Simulate).await;

    let result = svc
        .verify("MOCKTX99999", &"a".repeat(64))
        .await
        .unwrap();
    assert!(!result.verified);
    assert!(result.error.unwrap().contains("not found"));
}

#[tokio::test]
async fn test_unreachable_node_falls_back_to_simulated() {
    // Port 1 refuses connections immediately.
    let config = NotaryConfig {
        node_url: "http://127.0.0.1:1".to_string(),
        indexer_url: "http://127.0.0.1:1".to_string(),
        fallback: FallbackPolicy::Simulate,
        ..NotaryConfig::default()
    };
    let svc = NotaryService::from_config(config);

    let record = svc
        .notarize(b"offline document", Metadata::new())
        .await
        .unwrap();
    assert!(record.simulated);
    assert!(record.transaction_reference.starts_with("DEMO_"));

    // And the simulated record still verifies without any ledger.
    let result = svc
        .verify(&record.transaction_reference, record.document_hash.as_str())
        .await
        .unwrap();
    assert!(result.verified);
    assert!(result.simulated);
}

#[tokio::test]
async fn test_unreachable_node_fail_fast() {
    let config = NotaryConfig {
        node_url: "http://127.0.0.1:1".to_string(),
        indexer_url: "http://127.0.0.1:1".to_string(),
        fallback: FallbackPolicy::FailFast,
        ..NotaryConfig::default()
    };
    let svc = NotaryService::from_config(config);

    let err = svc
        .notarize(b"document", Metadata::new())
        .await
        .unwrap_err();
    assert!(matches!(err, NotarizeError::LedgerUnavailable(_)));
}

#[tokio::test]
async fn test_unreachable_indexer_reports_unverified() {
    // Write path up, read path down.
    let server = MockLedgerServer::new();
    let node_url = server.start().await;
    let config = NotaryConfig {
        node_url,
        indexer_url: "http://127.0.0.1:1".to_string(),
        fallback: FallbackPolicy::Simulate,
        ..NotaryConfig::default()
    };
    let svc = NotaryService::from_config(config);

    let record = svc.notarize(b"document", Metadata::new()).await.unwrap();
    assert!(!record.simulated);

    let result = svc
        .verify(&record.transaction_reference, record.document_hash.as_str())
        .await
        .unwrap();
    assert!(!result.verified);
    let error = result.error.unwrap();
    assert!(error.contains("Verification failed"));
    assert!(!error.contains("not found"));
}

#[tokio::test]
async fn test_https_endpoints_reach_the_connector() {
    // The default endpoints are https; the client must get as far as the
    // transport instead of rejecting the scheme outright. Against a
    // refusing port the failure is a connection error, never a scheme one.
    let client = HttpLedgerClient::new("https://127.0.0.1:1", "https://127.0.0.1:1");
    let err = client.network_params().await.unwrap_err();
    let message = err.to_string();
    assert!(!message.contains("scheme"));

    let defaults = NotaryConfig::default();
    assert!(defaults.node_url.starts_with("https://"));
    assert!(defaults.indexer_url.starts_with("https://"));
}

#[tokio::test]
async fn test_raw_client_submission_shape() {
    // The submitted bytes must parse as a zero-value self transaction;
    // the mock server enforces it with HTTP 400 otherwise.
    let server = MockLedgerServer::new();
    let url = server.start().await;
    let client = HttpLedgerClient::new(&url, &url);

    let err = client.submit(b"{\"txn\":{}}").await.unwrap_err();
    assert!(err.to_string().contains("rejected") || err.to_string().contains("400"));

    use lexanchor::infrastructure::identity::IdentityProvider;
    use lexanchor::infrastructure::transaction::PaymentTransaction;

    let params = client.network_params().await.unwrap();
    assert_eq!(params.min_fee, 1000);

    let identity = EphemeralIdentityProvider.create_identity().unwrap();
    let signed = PaymentTransaction::zero_value_self(identity.address(), b"note", &params)
        .sign(&identity)
        .unwrap();
    let tx_id = client.submit(&signed.to_bytes().unwrap()).await.unwrap();

    let confirmed = client.wait_for_confirmation(&tx_id, 4).await.unwrap();
    assert_eq!(confirmed, 41_000_001);

    let looked_up = client.lookup(&tx_id).await.unwrap();
    assert_eq!(looked_up.note, b"note");
}
