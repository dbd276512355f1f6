//! Static clinical thresholds and the pure sample evaluator.

use serde::{Deserialize, Serialize};

use crate::models::VitalSample;

/// Marker carried by the compound cardiac finding; the aggregation side
/// scans finding text for it to flag critical patients.
pub const CRITICAL_MARKER: &str = "CRITICAL";

const CARDIAC_DISTRESS_FINDING: &str = "CRITICAL: Possible cardiac distress detected";

/// Acceptable band for one vital, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalRange {
    pub min: f64,
    pub max: f64,
}

/// Static mapping from vital name to its acceptable range. Order is the
/// evaluation order, fixed at construction, so findings come out the same
/// way for the same sample every time.
#[derive(Debug, Clone)]
pub struct ThresholdTable {
    ranges: Vec<(&'static str, VitalRange)>,
}

impl ThresholdTable {
    pub fn new(ranges: Vec<(&'static str, VitalRange)>) -> Self {
        Self { ranges }
    }

    /// The standard clinical table used by both processes.
    pub fn standard() -> Self {
        Self::new(vec![
            ("heart_rate", VitalRange { min: 60.0, max: 100.0 }),
            ("blood_pressure_systolic", VitalRange { min: 90.0, max: 120.0 }),
            ("blood_pressure_diastolic", VitalRange { min: 60.0, max: 80.0 }),
            ("temperature", VitalRange { min: 36.1, max: 37.2 }),
            ("oxygen_saturation", VitalRange { min: 95.0, max: 100.0 }),
        ])
    }

    pub fn range(&self, vital: &str) -> Option<VitalRange> {
        self.ranges
            .iter()
            .find(|(name, _)| *name == vital)
            .map(|(_, range)| *range)
    }

    /// Evaluates a sample against the table: one finding per vital whose
    /// value lies strictly outside its band, in table order, then the
    /// compound cardiac rule. An unremarkable sample yields an empty list.
    pub fn evaluate(&self, sample: &VitalSample) -> Vec<String> {
        let mut findings = Vec::new();
        for (vital, range) in &self.ranges {
            let Some(value) = sample.reading(vital) else {
                continue;
            };
            if value < range.min {
                findings.push(format!("{vital} too low: {value} (min: {})", range.min));
            } else if value > range.max {
                findings.push(format!("{vital} too high: {value} (max: {})", range.max));
            }
        }

        // Compound rule: tachycardia with desaturation fires regardless of
        // the per-vital findings above.
        if let (Some(hr), Some(spo2)) = (sample.heart_rate, sample.oxygen_saturation) {
            if hr > 120.0 && spo2 < 92.0 {
                findings.push(CARDIAC_DISTRESS_FINDING.to_string());
            }
        }

        findings
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::standard()
    }
}
