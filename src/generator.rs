//! Simulated vital-sign synthesis.

use chrono::Utc;
use rand::Rng;

use crate::models::VitalSample;

/// Produces one randomized sample per call. The draw ranges deliberately
/// straddle the clinical bands so cycles mix alerting and non-alerting
/// samples; no state survives between calls beyond the thread RNG.
pub fn generate_sample(patient_id: &str) -> VitalSample {
    generate_sample_at(patient_id, Utc::now().timestamp_millis())
}

pub fn generate_sample_at(patient_id: &str, timestamp: i64) -> VitalSample {
    let mut rng = rand::thread_rng();
    VitalSample {
        patient_id: patient_id.to_string(),
        timestamp,
        heart_rate: Some(rng.gen_range(55..=130) as f64),
        blood_pressure_systolic: Some(rng.gen_range(85..=160) as f64),
        blood_pressure_diastolic: Some(rng.gen_range(50..=100) as f64),
        temperature: Some((rng.gen_range(35.5..=39.0_f64) * 10.0).round() / 10.0),
        oxygen_saturation: Some(rng.gen_range(90..=100) as f64),
    }
}
