//! Pure aggregation over stored patient data.
//!
//! The store hands back unordered maps; everything here turns them into
//! the ordered, deduplicated shapes the serving API exposes. No I/O.

use std::collections::HashMap;

use chrono::{TimeZone, Utc};

use crate::models::{
    ActiveAlert, AlertRecord, ChartData, GlobalAlert, PatientNode, PatientSummary, VitalSample,
};
use crate::thresholds::CRITICAL_MARKER;

/// Most recent sample by timestamp.
pub fn latest_sample(vitals: &HashMap<String, VitalSample>) -> Option<&VitalSample> {
    vitals.values().max_by_key(|sample| sample.timestamp)
}

/// Unresolved alerts with their store keys attached, oldest first.
pub fn active_alerts(alerts: &HashMap<String, AlertRecord>) -> Vec<ActiveAlert> {
    let mut active: Vec<ActiveAlert> = alerts
        .iter()
        .filter(|(_, record)| !record.resolved)
        .map(|(id, record)| ActiveAlert {
            id: id.clone(),
            timestamp: record.timestamp,
            findings: record.findings.clone(),
            priority: record.priority,
        })
        .collect();
    active.sort_by_key(|alert| alert.timestamp);
    active
}

/// A patient is critical while any active alert's findings, rendered as
/// text, carry the critical marker.
pub fn has_critical(active: &[ActiveAlert]) -> bool {
    active
        .iter()
        .any(|alert| alert.findings.join("\n").contains(CRITICAL_MARKER))
}

/// One `GET /api/patients` row.
pub fn summarize(id: &str, node: &PatientNode) -> PatientSummary {
    let active = active_alerts(&node.alerts);
    PatientSummary {
        id: id.to_string(),
        latest_vital: latest_sample(&node.vitals).cloned(),
        alert_count: active.len(),
        has_critical_alerts: has_critical(&active),
    }
}

/// Rebuilds aligned chart series from an unordered sample map. Samples
/// sort by timestamp ascending; a sample missing a reading contributes a
/// `null` at its position, so every series length equals the sample count.
pub fn chart_data(vitals: &HashMap<String, VitalSample>) -> ChartData {
    let mut samples: Vec<&VitalSample> = vitals.values().collect();
    samples.sort_by_key(|sample| sample.timestamp);

    let mut chart = ChartData::default();
    for sample in samples {
        chart.timestamps.push(time_label(sample.timestamp));
        chart.heart_rate.push(sample.heart_rate);
        chart.blood_pressure_systolic.push(sample.blood_pressure_systolic);
        chart.blood_pressure_diastolic.push(sample.blood_pressure_diastolic);
        chart.temperature.push(sample.temperature);
        chart.oxygen_saturation.push(sample.oxygen_saturation);
    }
    chart
}

fn time_label(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

/// Cross-patient active-alert listing: most severe first, oldest first
/// within a severity. The sort is stable, so equal keys keep their
/// relative order.
pub fn global_alerts(patients: &HashMap<String, PatientNode>) -> Vec<GlobalAlert> {
    let mut all: Vec<GlobalAlert> = patients
        .iter()
        .flat_map(|(patient_id, node)| {
            active_alerts(&node.alerts).into_iter().map(move |alert| GlobalAlert {
                patient_id: patient_id.clone(),
                alert_id: alert.id,
                timestamp: alert.timestamp,
                findings: alert.findings,
                priority: alert.priority,
            })
        })
        .collect();
    all.sort_by_key(|alert| (alert.priority.rank(), alert.timestamp));
    all
}
