//! Error taxonomy for the monitoring pipeline.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

/// Failures talking to the remote store. Not-found is not an error; reads
/// of missing paths return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed record at {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures delivering an outbound notification. Always caught and logged
/// at the dispatch boundary, never propagated past it.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notifier transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("notifier response carried no delivery sid")]
    MissingSid,
}

/// Handler-level errors for the serving API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        tracing::error!(error = %self, "request failed");
        HttpResponse::build(self.status_code())
            .json(json!({ "success": false, "error": self.to_string() }))
    }
}
