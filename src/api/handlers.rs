//! Request handlers for the dashboard API.

use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::aggregate;
use crate::api::AppState;
use crate::error::ApiError;
use crate::models::{PatientDetail, PatientNode, PatientSummary};

/// `GET /api/patients` — one summary row per stored patient. An empty or
/// missing `patients` branch is an empty list, not an error.
pub async fn list_patients(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let patients: HashMap<String, PatientNode> =
        state.store.get("patients").await?.unwrap_or_default();

    let mut summaries: Vec<PatientSummary> = patients
        .iter()
        .map(|(id, node)| aggregate::summarize(id, node))
        .collect();
    summaries.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(HttpResponse::Ok().json(summaries))
}

/// `GET /api/patient/{id}` — full detail for one patient. The latest
/// sample is also run through the evaluate-and-notify collaborator, which
/// may dispatch an outbound message; the response itself is built purely
/// from stored data.
pub async fn patient_detail(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let patient_id = path.into_inner();
    let node: PatientNode = state
        .store
        .get(&format!("patients/{patient_id}"))
        .await?
        .unwrap_or_default();

    let chart_data = aggregate::chart_data(&node.vitals);
    let alerts = aggregate::active_alerts(&node.alerts);
    let latest_vital = aggregate::latest_sample(&node.vitals).cloned();

    if let Some(sample) = &latest_vital {
        state.dispatcher.evaluate_and_notify(&patient_id, sample).await;
    }

    Ok(HttpResponse::Ok().json(PatientDetail {
        name: node.name.unwrap_or_else(|| "N/A".to_string()),
        vitals: node.vitals,
        chart_data,
        alerts,
        latest_vital,
    }))
}

/// `GET /api/alerts` — active alerts across all patients, most severe and
/// oldest first.
pub async fn list_alerts(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let patients: HashMap<String, PatientNode> =
        state.store.get("patients").await?.unwrap_or_default();
    Ok(HttpResponse::Ok().json(aggregate::global_alerts(&patients)))
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub alert_id: Option<String>,
}

/// `POST /api/alert/resolve` — flips `resolved` to true at the record
/// path. Idempotent: re-resolving is a no-op success. Missing identifiers
/// fail validation before any store call.
pub async fn resolve_alert(
    body: web::Json<ResolveRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let patient_id = required_field(&body.patient_id, "patient_id")?;
    let alert_id = required_field(&body.alert_id, "alert_id")?;

    state
        .store
        .patch(
            &format!("patients/{patient_id}/alerts/{alert_id}"),
            &json!({ "resolved": true }),
        )
        .await?;
    info!(patient_id, alert_id, "alert resolved");

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

fn required_field<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ApiError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::Validation(format!("missing required field: {name}"))),
    }
}
