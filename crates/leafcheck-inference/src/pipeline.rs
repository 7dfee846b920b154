//! Per-request prediction pipeline.

use std::sync::Arc;
use std::time::Instant;

use leafcheck_models::Decision;
use ndarray::{Array4, Axis};
use tracing::debug;

use crate::decoder::decode_image;
use crate::error::{InferenceError, InferenceResult};
use crate::model::{ModelInfo, ModelService, RawOutputVector};
use crate::policy::ClassificationPolicy;

/// Decode -> batch -> infer -> decide, in that order, once per request.
///
/// Holds no per-request state; the model is shared read-only.
pub struct PredictionPipeline {
    model: Arc<dyn ModelService>,
    policy: ClassificationPolicy,
}

impl PredictionPipeline {
    pub fn new(model: Arc<dyn ModelService>, policy: ClassificationPolicy) -> Self {
        Self { model, policy }
    }

    /// Classify one uploaded image.
    ///
    /// Decode and inference failures are returned unchanged; the model is
    /// not invoked when decoding fails. Non-finite scores are an inference
    /// failure.
    pub fn predict(&self, bytes: &[u8]) -> InferenceResult<Decision> {
        let started = Instant::now();

        let tensor = decode_image(bytes)?;
        let (height, width) = (tensor.shape()[0], tensor.shape()[1]);
        let decoded_at = Instant::now();

        let scores = self.run_model(tensor.insert_axis(Axis(0)))?;
        let decision = self.policy.decide(&scores);

        debug!(
            height,
            width,
            status = %decision.status(),
            confidence = decision.confidence_percent(),
            decode_ms = decoded_at.duration_since(started).as_millis() as u64,
            infer_ms = decoded_at.elapsed().as_millis() as u64,
            "Prediction completed"
        );

        Ok(decision)
    }

    /// Run a zero image of `size`x`size` through the model and check that
    /// the output lines up with the class table.
    pub fn probe(&self, size: u32) -> InferenceResult<()> {
        let side = size as usize;
        self.run_model(Array4::zeros((1, side, side, 3)))?;
        Ok(())
    }

    pub fn model_info(&self) -> ModelInfo {
        self.model.info()
    }

    pub fn policy(&self) -> &ClassificationPolicy {
        &self.policy
    }

    fn run_model(&self, batch: Array4<f32>) -> InferenceResult<RawOutputVector> {
        let scores = self.model.infer(batch)?;
        let expected = self.policy.class_names().len();
        if scores.len() != expected {
            return Err(InferenceError::OutputMismatch {
                expected,
                actual: scores.len(),
            });
        }
        // Confidence is reported as a fixed-point percentage
        if let Some(index) = scores.iter().position(|s| !s.is_finite()) {
            return Err(InferenceError::inference(format!(
                "model returned non-finite score {} at index {index}",
                scores[index]
            )));
        }
        Ok(scores)
    }
}
