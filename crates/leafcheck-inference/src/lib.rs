//! Inference core for leaf disease classification.
//!
//! This crate provides:
//! - Decoding of uploaded image bytes into `(H, W, 3)` f32 tensors
//! - An ONNX Runtime backed model service loaded once per process
//! - The confidence policy that turns raw scores into a decision
//! - The pipeline that runs the three in order for one request

pub mod config;
pub mod decoder;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod policy;

pub use config::{ModelConfig, PolicyConfig};
pub use decoder::{decode_image, ImageTensor};
pub use error::{InferenceError, InferenceResult};
pub use model::{InputBatch, ModelInfo, ModelService, OrtModelService, RawOutputVector};
pub use pipeline::PredictionPipeline;
pub use policy::ClassificationPolicy;
