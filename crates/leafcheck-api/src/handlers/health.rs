//! Health check handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use leafcheck_models::PingResponse;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Fixed acknowledgement for clients that only check reachability.
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse::default())
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub model: ModelStatus,
}

#[derive(Serialize)]
pub struct ModelStatus {
    pub name: String,
    pub input: String,
    pub output: String,
    pub classes: Vec<String>,
    pub confidence_threshold: f64,
}

/// Readiness check endpoint (readiness probe).
///
/// State only exists once the model has loaded, so reaching this handler
/// means the classifier is ready.
pub async fn ready(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let info = state.pipeline.model_info();
    let policy = state.pipeline.policy();

    Json(ReadinessResponse {
        status: "ready".to_string(),
        model: ModelStatus {
            name: info.name,
            input: info.input,
            output: info.output,
            classes: policy.class_names().as_slice().to_vec(),
            confidence_threshold: policy.threshold_percent(),
        },
    })
}
