//! Model and policy configuration.

use std::path::PathBuf;

use leafcheck_models::{ClassNames, POTATO_LABEL_PREFIX};

/// Default confidence gate, in percent.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 65.0;

/// Default side length of the load-time probe image.
pub const DEFAULT_PROBE_SIZE: u32 = 256;

/// Configuration for loading the inference artifact.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Path to the exported ONNX model
    pub model_path: PathBuf,
    /// Graph output holding class scores; `None` selects the first declared output
    pub primary_output_key: Option<String>,
    /// Side length of a zero image run once after load to validate the
    /// output length; `None` skips the probe
    pub probe_size: Option<u32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("saved_models/1/model.onnx"),
            primary_output_key: None,
            probe_size: Some(DEFAULT_PROBE_SIZE),
        }
    }
}

impl ModelConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            model_path: std::env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            primary_output_key: std::env::var("MODEL_OUTPUT_KEY")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            probe_size: match std::env::var("MODEL_PROBE_SIZE")
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
            {
                Some(0) => None,
                Some(size) => Some(size),
                None => defaults.probe_size,
            },
        }
    }
}

/// Configuration for the confidence policy.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// Internal labels in model output order
    pub class_names: ClassNames,
    /// Scores below this percentage are reported as uncertain
    pub threshold_percent: f64,
    /// Organism prefix stripped from labels
    pub label_prefix: String,
    /// Separator in internal labels, shown as a space
    pub separator: char,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            class_names: ClassNames::potato(),
            threshold_percent: DEFAULT_CONFIDENCE_THRESHOLD,
            label_prefix: POTATO_LABEL_PREFIX.to_string(),
            separator: '_',
        }
    }
}

impl PolicyConfig {
    /// Create config from environment variables.
    ///
    /// Only the threshold is tunable per deployment; the class table
    /// follows the model.
    pub fn from_env() -> Self {
        Self {
            threshold_percent: std::env::var("CONFIDENCE_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_default() {
        let config = ModelConfig::default();
        assert_eq!(config.probe_size, Some(256));
        assert!(config.primary_output_key.is_none());
    }

    #[test]
    fn test_policy_config_default() {
        let config = PolicyConfig::default();
        assert_eq!(config.class_names.len(), 3);
        assert!((config.threshold_percent - 65.0).abs() < f64::EPSILON);
        assert_eq!(config.label_prefix, "Potato___");
        assert_eq!(config.separator, '_');
    }
}
