//! Serving API: read endpoints over the aggregated store plus the one
//! alert-resolution write endpoint.

pub mod handlers;

use actix_web::web;

use crate::notify::AlertDispatcher;
use crate::store::StoreClient;

/// Shared per-worker state. Everything here is read-only or internally
/// synchronized, so handlers stay stateless across requests.
#[derive(Clone)]
pub struct AppState {
    pub store: StoreClient,
    pub dispatcher: AlertDispatcher,
}

/// Mounts the API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/patients", web::get().to(handlers::list_patients))
            .route("/patient/{id}", web::get().to(handlers::patient_detail))
            .route("/alerts", web::get().to(handlers::list_alerts))
            .route("/alert/resolve", web::post().to(handlers::resolve_alert)),
    );
}
