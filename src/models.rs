//! Typed records for the monitoring pipeline.
//!
//! Everything read from or written to the remote store deserializes into
//! these structs; shape problems surface as decode errors instead of
//! propagating untyped maps through the system.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One timestamped set of physiological readings for a patient.
/// Immutable once written to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSample {
    pub patient_id: String,
    /// Milliseconds since epoch; doubles as the store key and sort key.
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure_systolic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure_diastolic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oxygen_saturation: Option<f64>,
}

impl VitalSample {
    /// Reading for a vital by name, `None` when the sample lacks it.
    pub fn reading(&self, vital: &str) -> Option<f64> {
        match vital {
            "heart_rate" => self.heart_rate,
            "blood_pressure_systolic" => self.blood_pressure_systolic,
            "blood_pressure_diastolic" => self.blood_pressure_diastolic,
            "temperature" => self.temperature,
            "oxygen_saturation" => self.oxygen_saturation,
            _ => None,
        }
    }
}

/// Alert severity, ranked for the global listing. Values the store holds
/// that we do not recognize sort after everything we do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
    #[serde(other)]
    Unknown,
}

impl Priority {
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
            Priority::Unknown => 3,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// A persisted finding-set. The store map key is its identifier; only the
/// `resolved` flag ever changes after creation, false to true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub timestamp: i64,
    pub findings: Vec<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub resolved: bool,
}

/// Store shape under `patients/{id}`. Absent branches deserialize to
/// empty collections rather than failing the whole read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientNode {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vitals: HashMap<String, VitalSample>,
    #[serde(default)]
    pub alerts: HashMap<String, AlertRecord>,
}

// ===== API response shapes =====

/// One row of `GET /api/patients`.
#[derive(Debug, Clone, Serialize)]
pub struct PatientSummary {
    pub id: String,
    pub latest_vital: Option<VitalSample>,
    pub alert_count: usize,
    pub has_critical_alerts: bool,
}

/// An unresolved alert enriched with its store key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveAlert {
    pub id: String,
    pub timestamp: i64,
    pub findings: Vec<String>,
    pub priority: Priority,
}

/// An active alert in the cross-patient listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalAlert {
    pub patient_id: String,
    pub alert_id: String,
    pub timestamp: i64,
    pub findings: Vec<String>,
    pub priority: Priority,
}

/// Aligned chart series; every series has one slot per stored sample,
/// `null` where the sample lacks the reading.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartData {
    pub timestamps: Vec<String>,
    pub heart_rate: Vec<Option<f64>>,
    pub blood_pressure_systolic: Vec<Option<f64>>,
    pub blood_pressure_diastolic: Vec<Option<f64>>,
    pub temperature: Vec<Option<f64>>,
    pub oxygen_saturation: Vec<Option<f64>>,
}

/// `GET /api/patient/{id}` body.
#[derive(Debug, Clone, Serialize)]
pub struct PatientDetail {
    pub name: String,
    pub vitals: HashMap<String, VitalSample>,
    pub chart_data: ChartData,
    pub alerts: Vec<ActiveAlert>,
    pub latest_vital: Option<VitalSample>,
}
