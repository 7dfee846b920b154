//! Application state.

use std::sync::Arc;

use leafcheck_inference::{
    ClassificationPolicy, InferenceResult, ModelService, OrtModelService, PredictionPipeline,
};
use tracing::info;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: Arc<PredictionPipeline>,
}

impl AppState {
    /// Load the model and build the prediction pipeline.
    ///
    /// Any failure here is fatal: the server must not start without a
    /// usable model.
    pub fn new(config: ApiConfig) -> InferenceResult<Self> {
        let model: Arc<dyn ModelService> = Arc::new(OrtModelService::load(&config.model)?);
        let policy = ClassificationPolicy::new(config.policy.clone())?;
        let pipeline = PredictionPipeline::new(model, policy);

        if let Some(size) = config.model.probe_size {
            pipeline.probe(size)?;
            info!(probe_size = size, "Model output matches class table");
        }

        Ok(Self::with_pipeline(config, pipeline))
    }

    /// Build state around an existing pipeline.
    pub fn with_pipeline(config: ApiConfig, pipeline: PredictionPipeline) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
        }
    }
}
