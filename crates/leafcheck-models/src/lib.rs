//! Shared data models for the LeafCheck classifier.
//!
//! This crate provides Serde-serializable types for:
//! - Classification decisions produced by the inference pipeline
//! - The HTTP prediction response schema
//! - The class table the deployed model was trained against

pub mod classes;
pub mod decision;
pub mod response;

// Re-export common types
pub use classes::{ClassNames, POTATO_CLASS_NAMES, POTATO_LABEL_PREFIX};
pub use decision::{Decision, DecisionStatus};
pub use response::{format_confidence, PingResponse, PredictionResponse, UNCERTAIN_LABEL};
