//! Store client behavior against an HTTP double.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vitalwatch::error::StoreError;
use vitalwatch::models::AlertRecord;
use vitalwatch::store::StoreClient;

async fn client_for(server: &MockServer) -> StoreClient {
    StoreClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn get_decodes_typed_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients/patient_001/alerts/a1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timestamp": 2000,
            "findings": ["heart_rate too high: 125 (max: 100)"],
            "priority": "HIGH",
            "resolved": false
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let record: Option<AlertRecord> =
        client.get("patients/patient_001/alerts/a1").await.unwrap();
    let record = record.unwrap();
    assert_eq!(record.timestamp, 2000);
    assert!(!record.resolved);
}

#[tokio::test]
async fn get_of_missing_path_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients/ghost.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let record: Option<AlertRecord> = client.get("patients/ghost").await.unwrap();
    assert!(record.is_none());
}

#[tokio::test]
async fn malformed_record_is_a_decode_error_naming_the_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients/bad.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"timestamp": "yesterday"})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result: Result<Option<AlertRecord>, _> = client.get("patients/bad").await;
    match result {
        Err(StoreError::Decode { path, .. }) => assert_eq!(path, "patients/bad"),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn put_writes_the_full_value() {
    let server = MockServer::start().await;
    let body = json!({"timestamp": 1000, "findings": [], "priority": "MEDIUM", "resolved": false});
    Mock::given(method("PUT"))
        .and(path("/patients/patient_001/alerts/a1.json"))
        .and(body_json(&body))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.put("patients/patient_001/alerts/a1", &body).await.unwrap();
}

#[tokio::test]
async fn patch_sends_a_partial_merge() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/patients/patient_001/alerts/a1.json"))
        .and(body_json(json!({"resolved": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resolved": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client
        .patch("patients/patient_001/alerts/a1", &json!({"resolved": true}))
        .await
        .unwrap();
}

#[tokio::test]
async fn server_errors_surface_as_transport_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result: Result<Option<serde_json::Value>, _> = client.get("patients").await;
    assert!(matches!(result, Err(StoreError::Transport(_))));
}
