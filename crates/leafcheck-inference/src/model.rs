//! Model service backed by ONNX Runtime.
//!
//! The classifier is the ONNX export of the artifact's `serving_default`
//! signature. Tensor names are resolved once at load so callers only ever
//! see `infer(batch) -> scores`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::{DynValue, Tensor};
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::error::{InferenceError, InferenceResult};

/// Decoded image with a leading batch dimension of 1: `(1, H, W, 3)`.
pub type InputBatch = Array4<f32>;

/// One score per class, in class table order.
pub type RawOutputVector = Vec<f32>;

/// Resolved identity of a loaded model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: String,
    pub input: String,
    pub output: String,
}

/// Single-image classifier.
///
/// Implementations are shared across request handlers and must be safe to
/// call concurrently.
pub trait ModelService: Send + Sync {
    /// Run one forward pass and return the scores for the only image in `batch`.
    fn infer(&self, batch: InputBatch) -> InferenceResult<RawOutputVector>;

    /// Model identity for readiness reporting and logs.
    fn info(&self) -> ModelInfo;
}

/// ONNX Runtime wrapper for the exported classifier.
///
/// `Session::run` needs exclusive access, so calls are serialized behind a
/// mutex.
pub struct OrtModelService {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    model_path: PathBuf,
}

impl OrtModelService {
    /// Load the model and resolve its input and output tensors.
    ///
    /// This is the only place the artifact is read from disk.
    pub fn load(config: &ModelConfig) -> InferenceResult<Self> {
        let model_path = config.model_path.as_path();
        if !model_path.exists() {
            return Err(InferenceError::model_not_found(model_path));
        }

        let session = create_session(model_path)?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| InferenceError::model_load("model declares no inputs"))?;

        let declared: Vec<String> = session
            .outputs
            .iter()
            .map(|output| output.name.clone())
            .collect();
        let output_name = select_output(&declared, config.primary_output_key.as_deref())?;

        info!(
            model_path = %model_path.display(),
            input = %input_name,
            output = %output_name,
            declared_outputs = declared.len(),
            "Classifier model loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            model_path: model_path.to_path_buf(),
        })
    }
}

impl ModelService for OrtModelService {
    fn infer(&self, batch: InputBatch) -> InferenceResult<RawOutputVector> {
        check_batch(&batch)?;

        let shape = batch.shape().to_vec();
        let data: Vec<f32> = batch.iter().copied().collect();
        let input = Tensor::from_array((shape, data.into_boxed_slice()))
            .map(DynValue::from)
            .map_err(|e| InferenceError::inference(format!("ORT tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::inference("ORT session poisoned"))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| InferenceError::inference(format!("ORT run failed: {e}")))?;

        let output = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            InferenceError::inference(format!("missing output tensor {}", self.output_name))
        })?;

        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::inference(format!("ORT extract: {e}")))?;

        let scores = first_row(&shape[..], data)?;
        debug!(scores = scores.len(), "Forward pass completed");
        Ok(scores)
    }

    fn info(&self) -> ModelInfo {
        let name = self
            .model_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.model_path.display().to_string());
        ModelInfo {
            name,
            input: self.input_name.clone(),
            output: self.output_name.clone(),
        }
    }
}

/// Exactly one image per forward pass.
fn check_batch(batch: &InputBatch) -> InferenceResult<()> {
    match batch.shape()[0] {
        1 => Ok(()),
        n => Err(InferenceError::BatchSize(n)),
    }
}

/// Pick the score tensor among the graph's declared outputs.
///
/// An explicit key must be declared by the graph. Without one the first
/// declared output is used.
pub fn select_output(declared: &[String], key: Option<&str>) -> InferenceResult<String> {
    match key {
        Some(key) => declared
            .iter()
            .find(|name| name.as_str() == key)
            .cloned()
            .ok_or_else(|| {
                InferenceError::model_load(format!(
                    "output {key:?} not declared by model (available: {})",
                    declared.join(", ")
                ))
            }),
        None => declared
            .first()
            .cloned()
            .ok_or_else(|| InferenceError::model_load("model declares no outputs")),
    }
}

/// Take the first row of a `(batch, classes)` output.
///
/// A rank-1 output is treated as a single row.
fn first_row(shape: &[i64], data: &[f32]) -> InferenceResult<RawOutputVector> {
    let row_len = match shape {
        [] => {
            return Err(InferenceError::inference("model returned a scalar output"));
        }
        [_] => data.len(),
        [batch, ..] if *batch >= 1 => data.len() / *batch as usize,
        _ => {
            return Err(InferenceError::inference(format!(
                "unexpected output shape: {shape:?}"
            )));
        }
    };

    Ok(data[..row_len].to_vec())
}

/// Create a CPU ONNX Runtime session from a model file.
fn create_session(model_path: &Path) -> InferenceResult<Session> {
    let model_bytes = std::fs::read(model_path)
        .map_err(|e| InferenceError::model_load(format!("read model file: {e}")))?;

    Session::builder()
        .map_err(|e| InferenceError::model_load(format!("ORT session builder: {e}")))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| InferenceError::model_load(format!("ORT opt level: {e}")))?
        .commit_from_memory(&model_bytes)
        .map_err(|e| InferenceError::model_load(format!("ORT load model: {e}")))
}
