//! Leaf classification handler.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::Json;
use leafcheck_models::PredictionResponse;
use tracing::{error, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Multipart field carrying the image.
pub const UPLOAD_FIELD: &str = "file";

/// Classify one uploaded leaf image.
///
/// Uncertain results are successful responses; decode failures are 400s and
/// model failures are 500s.
pub async fn predict(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<PredictionResponse>> {
    let bytes = read_upload(&mut multipart).await?;
    let upload_bytes = bytes.len();

    let pipeline = Arc::clone(&state.pipeline);
    let start = Instant::now();
    let result = tokio::task::spawn_blocking(move || pipeline.predict(&bytes))
        .await
        .map_err(|e| ApiError::internal(format!("prediction task failed: {e}")))?;
    metrics::record_inference_duration(start.elapsed().as_secs_f64());

    match result {
        Ok(decision) => {
            metrics::record_prediction(decision.status().as_str());
            info!(
                status = %decision.status(),
                label = decision.label().unwrap_or("-"),
                confidence = decision.confidence_percent(),
                upload_bytes,
                "Leaf classified"
            );
            Ok(Json(PredictionResponse::from(&decision)))
        }
        Err(e) => {
            metrics::record_prediction("failed");
            if e.is_client_error() {
                warn!(error = %e, upload_bytes, "Rejected upload");
            } else {
                error!(error = %e, upload_bytes, "Prediction failed");
            }
            Err(e.into())
        }
    }
}

/// Read the bytes of the `file` field, skipping any other fields.
async fn read_upload(multipart: &mut Multipart) -> ApiResult<Bytes> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            return Ok(field.bytes().await?);
        }
    }
    Err(ApiError::bad_request(format!(
        "missing multipart field '{UPLOAD_FIELD}'"
    )))
}
