//! Monitor cycle behavior: persist, evaluate, record, dispatch.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vitalwatch::models::VitalSample;
use vitalwatch::monitor::Monitor;
use vitalwatch::notify::{AlertDispatcher, AlertNotifier, NotifierConfig};
use vitalwatch::store::StoreClient;
use vitalwatch::thresholds::ThresholdTable;

fn notifier_config(api_base: String) -> NotifierConfig {
    NotifierConfig {
        account_sid: "AC_test".to_string(),
        auth_token: "token".to_string(),
        from_number: "whatsapp:+14155238886".to_string(),
        alert_recipient: "whatsapp:+10000000000".to_string(),
        api_base,
    }
}

fn monitor_for(store: &MockServer, notifier: &MockServer) -> Monitor {
    let store_client = StoreClient::new(&store.uri(), Duration::from_secs(5)).unwrap();
    let alert_notifier = AlertNotifier::new(notifier_config(notifier.uri())).unwrap();
    let dispatcher = AlertDispatcher::new(ThresholdTable::standard(), alert_notifier);
    Monitor::new(
        store_client,
        dispatcher,
        vec!["patient_007".to_string()],
        Duration::from_secs(10),
    )
}

fn sample(hr: f64, spo2: f64) -> VitalSample {
    VitalSample {
        patient_id: "patient_007".to_string(),
        timestamp: 2_000,
        heart_rate: Some(hr),
        blood_pressure_systolic: Some(110.0),
        blood_pressure_diastolic: Some(70.0),
        temperature: Some(36.8),
        oxygen_saturation: Some(spo2),
    }
}

#[tokio::test]
async fn critical_sample_records_a_high_priority_alert_and_notifies() {
    let store = MockServer::start().await;
    let notifier = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/patients/patient_007/vitals/2000.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&store)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/patients/patient_007/alerts/[0-9a-f-]+\.json$"))
        .and(body_partial_json(json!({"priority": "HIGH", "resolved": false, "timestamp": 2000})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&store)
        .await;
    Mock::given(method("POST"))
        .and(path("/2010-04-01/Accounts/AC_test/Messages.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sid": "SM123"})))
        .expect(1)
        .mount(&notifier)
        .await;

    let monitor = monitor_for(&store, &notifier);
    let findings = monitor.record_sample(&sample(125.0, 90.0)).await.unwrap();

    assert_eq!(
        findings,
        vec![
            "heart_rate too high: 125 (max: 100)".to_string(),
            "oxygen_saturation too low: 90 (min: 95)".to_string(),
            "CRITICAL: Possible cardiac distress detected".to_string(),
        ]
    );
}

#[tokio::test]
async fn in_band_sample_records_no_alert_and_sends_nothing() {
    let store = MockServer::start().await;
    let notifier = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/patients/patient_007/vitals/2000.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&store)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/patients/patient_007/alerts/.+$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&store)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&notifier)
        .await;

    let monitor = monitor_for(&store, &notifier);
    let findings = monitor.record_sample(&sample(75.0, 98.0)).await.unwrap();
    assert!(findings.is_empty());
}

#[tokio::test]
async fn failed_sample_write_leaves_no_alert_behind() {
    let store = MockServer::start().await;
    let notifier = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/patients/patient_007/vitals/2000.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&store)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/patients/patient_007/alerts/.+$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&store)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&notifier)
        .await;

    let monitor = monitor_for(&store, &notifier);
    assert!(monitor.record_sample(&sample(125.0, 90.0)).await.is_err());
}

#[tokio::test]
async fn notifier_failure_does_not_abort_the_cycle() {
    let store = MockServer::start().await;
    let notifier = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/patients/patient_007/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&store)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&notifier)
        .await;

    let monitor = monitor_for(&store, &notifier);
    let findings = monitor.record_sample(&sample(125.0, 90.0)).await.unwrap();
    assert_eq!(findings.len(), 3);
}
