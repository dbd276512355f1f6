//! Fixed-interval generator/evaluator loop.

use std::time::Duration;

use tracing::{error, info};
use uuid::Uuid;

use crate::error::StoreError;
use crate::generator;
use crate::models::{AlertRecord, Priority, VitalSample};
use crate::notify::AlertDispatcher;
use crate::store::StoreClient;
use crate::thresholds::CRITICAL_MARKER;

/// Drives one sample per patient per cycle: synthesize, persist, evaluate,
/// record and dispatch alerts. Single-threaded and sequential; each cycle
/// blocks on its network calls, so cycles can never overlap.
pub struct Monitor {
    store: StoreClient,
    dispatcher: AlertDispatcher,
    patient_ids: Vec<String>,
    interval: Duration,
}

impl Monitor {
    pub fn new(
        store: StoreClient,
        dispatcher: AlertDispatcher,
        patient_ids: Vec<String>,
        interval: Duration,
    ) -> Self {
        Self { store, dispatcher, patient_ids, interval }
    }

    /// Runs forever with one fixed delay between full cycles. A failing
    /// patient never stops the loop; the failure is logged and the loop
    /// moves on.
    pub async fn run(&self) {
        info!(patients = self.patient_ids.len(), "monitor loop started");
        loop {
            for patient_id in &self.patient_ids {
                if let Err(err) = self.run_cycle(patient_id).await {
                    error!(error = %err, %patient_id, "cycle failed, continuing");
                }
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One patient's cycle. The sample write must succeed before any alert
    /// is recorded; an unpersisted sample leaves no trace.
    pub async fn run_cycle(&self, patient_id: &str) -> Result<Vec<String>, StoreError> {
        let sample = generator::generate_sample(patient_id);
        self.record_sample(&sample).await
    }

    /// Persists `sample`, evaluates it and records/dispatches any alert.
    /// Split from `run_cycle` so callers can feed a known sample.
    pub async fn record_sample(&self, sample: &VitalSample) -> Result<Vec<String>, StoreError> {
        let patient_id = sample.patient_id.as_str();
        let vitals_path = format!("patients/{patient_id}/vitals/{}", sample.timestamp);
        self.store.put(&vitals_path, sample).await?;
        info!(patient_id, timestamp = sample.timestamp, "sample stored");

        let findings = self.dispatcher.evaluate_and_notify(patient_id, sample).await;
        if findings.is_empty() {
            info!(patient_id, "all vitals within normal range");
            return Ok(findings);
        }

        for finding in &findings {
            info!(patient_id, %finding, "vital out of range");
        }

        let record = AlertRecord {
            timestamp: sample.timestamp,
            findings: findings.clone(),
            priority: priority_for(&findings),
            resolved: false,
        };
        let alert_id = Uuid::new_v4();
        let alert_path = format!("patients/{patient_id}/alerts/{alert_id}");
        self.store.put(&alert_path, &record).await?;
        info!(patient_id, %alert_id, ?record.priority, "alert recorded");

        Ok(findings)
    }
}

fn priority_for(findings: &[String]) -> Priority {
    if findings.iter().any(|f| f.contains(CRITICAL_MARKER)) {
        Priority::High
    } else {
        Priority::Medium
    }
}
