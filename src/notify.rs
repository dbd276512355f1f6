//! Outbound alert notification.
//!
//! Delivery goes through a Twilio-compatible messaging API. Failures here
//! are logged and swallowed by the dispatcher; a lost message must never
//! abort the evaluation or serving path that triggered it.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::NotifyError;
use crate::models::VitalSample;
use crate::thresholds::ThresholdTable;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct NotifierConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub alert_recipient: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    "https://api.twilio.com".to_string()
}

/// Thin client over the messaging provider.
#[derive(Debug, Clone)]
pub struct AlertNotifier {
    http: Client,
    config: NotifierConfig,
}

impl AlertNotifier {
    pub fn new(config: NotifierConfig) -> Result<Self, NotifyError> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { http, config })
    }

    /// Sends one message; returns the provider's delivery identifier.
    pub async fn send(&self, to: &str, body: &str) -> Result<String, NotifyError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        );
        let response = self
            .http
            .post(url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[("To", to), ("From", self.config.from_number.as_str()), ("Body", body)])
            .send()
            .await?
            .error_for_status()?;

        let payload: Value = response.json().await?;
        let sid = payload["sid"].as_str().ok_or(NotifyError::MissingSid)?;
        info!(sid, to, "alert message delivered");
        Ok(sid.to_string())
    }
}

/// Message body: patient identifier plus the newline-joined findings.
pub fn compose_alert_body(patient_id: &str, findings: &[String]) -> String {
    format!("CRITICAL ALERT for Patient {patient_id}:\n{}", findings.join("\n"))
}

/// Evaluate-and-notify collaborator. The serving read path stays a pure
/// query; any caller that wants the notification side effect invokes this
/// explicitly with the sample it read.
#[derive(Debug, Clone)]
pub struct AlertDispatcher {
    thresholds: ThresholdTable,
    notifier: AlertNotifier,
}

impl AlertDispatcher {
    pub fn new(thresholds: ThresholdTable, notifier: AlertNotifier) -> Self {
        Self { thresholds, notifier }
    }

    /// Runs the threshold evaluator over `sample` and, when anything is
    /// out of band, dispatches one message to the configured recipient.
    /// Returns the findings either way; delivery failure only logs.
    pub async fn evaluate_and_notify(&self, patient_id: &str, sample: &VitalSample) -> Vec<String> {
        let findings = self.thresholds.evaluate(sample);
        if findings.is_empty() {
            return findings;
        }

        let body = compose_alert_body(patient_id, &findings);
        let recipient = self.notifier.config.alert_recipient.clone();
        if let Err(err) = self.notifier.send(&recipient, &body).await {
            warn!(error = %err, patient_id, "alert notification failed");
        }
        findings
    }
}
