//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("healthy"))
}

/// Readiness check (includes storage)
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let results = state.beneficiaries.health_check().await;

    if results.iter().all(|r| r.is_operational()) {
        (StatusCode::OK, Json(HealthResponse::new("ready")))
    } else {
        for result in results.iter().filter(|r| !r.is_operational()) {
            warn!(
                adapter = %result.adapter_id,
                message = result.message.as_deref().unwrap_or(""),
                "Storage not ready"
            );
        }
        (StatusCode::SERVICE_UNAVAILABLE, Json(HealthResponse::new("unavailable")))
    }
}
