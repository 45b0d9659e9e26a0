//! Health check endpoints for Kubernetes probes

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing: Option<SigningStatus>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// Configured oracle; readiness never calls it
#[derive(Debug, Serialize)]
pub struct SigningStatus {
    pub backend: &'static str,
    pub key_id: String,
    pub algorithm: &'static str,
    pub token_validity_secs: i64,
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION"),
        signing: None,
    };

    (StatusCode::OK, Json(response))
}

/// GET /ready
///
/// The service holds no state of its own, so it is ready once configured.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let service = &state.token_service;

    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION"),
        signing: Some(SigningStatus {
            backend: service.backend_name(),
            key_id: service.key_reference().to_string(),
            algorithm: service.algorithm().jwt_name(),
            token_validity_secs: service.validity_secs(),
        }),
    };

    (StatusCode::OK, Json(response))
}

/// GET /live
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}
