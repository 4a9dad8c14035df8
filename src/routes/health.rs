//! Health check endpoints for liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::errors::ApiResponse;
use crate::templates::SUMMARY_TEMPLATE;
use crate::AppState;

/// Readiness probe detail.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub storage: String,
    pub templates: String,
}

/// Liveness probe: always returns OK if the process is running.
pub async fn live() -> &'static str {
    "OK"
}

/// Readiness probe: checks summary storage and the page templates.
/// A degraded instance answers 503 with the failing checks in the error envelope.
pub async fn ready(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthStatus>>) {
    let storage = match state.summaries.ping().await {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Storage health check failed");
            Some(format!("storage: {e}"))
        }
    };

    let templates = match state.templates.contains(SUMMARY_TEMPLATE) {
        Ok(true) => None,
        Ok(false) => Some(format!("templates: missing {SUMMARY_TEMPLATE}")),
        Err(e) => {
            tracing::warn!(error = %e, "Template health check failed");
            Some(format!("templates: {e}"))
        }
    };

    let failures: Vec<String> = storage.into_iter().chain(templates).collect();
    if !failures.is_empty() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            ApiResponse::error("NOT_READY", &failures.join("; ")),
        );
    }

    (
        StatusCode::OK,
        ApiResponse::success(HealthStatus {
            status: "ok".to_string(),
            storage: "connected".to_string(),
            templates: "loaded".to_string(),
        }),
    )
}
