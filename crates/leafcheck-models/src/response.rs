//! HTTP response schemas.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::decision::Decision;

/// `disease` value reported for uncertain decisions.
pub const UNCERTAIN_LABEL: &str = "Uncertain";

/// Body of a successful prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PredictionResponse {
    /// Cleaned class label, or `"Uncertain"`.
    pub disease: String,
    /// Confidence with exactly two decimals and a percent sign, e.g. `"72.35%"`.
    pub confidence: String,
}

impl From<&Decision> for PredictionResponse {
    fn from(decision: &Decision) -> Self {
        let disease = decision.label().unwrap_or(UNCERTAIN_LABEL).to_string();
        Self {
            disease,
            confidence: format_confidence(decision.confidence_percent()),
        }
    }
}

impl From<Decision> for PredictionResponse {
    fn from(decision: Decision) -> Self {
        Self::from(&decision)
    }
}

/// Body of the liveness ping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PingResponse {
    pub message: String,
}

impl Default for PingResponse {
    fn default() -> Self {
        Self {
            message: "API is working".to_string(),
        }
    }
}

/// Render a confidence percentage for display.
///
/// Rounds half away from zero at two decimals before formatting, so
/// `72.345` renders as `"72.35%"` even though its binary value sits just
/// below the midpoint. Expects a finite value; the prediction pipeline
/// rejects non-finite scores before a decision is made.
pub fn format_confidence(confidence_percent: f64) -> String {
    let rounded = (confidence_percent * 100.0).round() / 100.0;
    format!("{:.2}%", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_confidence_rounds() {
        assert_eq!(format_confidence(72.345), "72.35%");
        assert_eq!(format_confidence(72.344), "72.34%");
        assert_eq!(format_confidence(70.0), "70.00%");
        assert_eq!(format_confidence(100.0), "100.00%");
        assert_eq!(format_confidence(0.0), "0.00%");
    }

    #[test]
    fn test_format_confidence_passes_out_of_range_values() {
        assert_eq!(format_confidence(120.0), "120.00%");
        assert_eq!(format_confidence(-3.456), "-3.46%");
    }

    #[test]
    fn test_response_from_classified() {
        let response = PredictionResponse::from(Decision::classified("Late blight", 93.1234));
        assert_eq!(response.disease, "Late blight");
        assert_eq!(response.confidence, "93.12%");
    }

    #[test]
    fn test_response_from_uncertain() {
        let response = PredictionResponse::from(Decision::uncertain(51.0));
        assert_eq!(response.disease, "Uncertain");
        assert_eq!(response.confidence, "51.00%");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"disease": "Uncertain", "confidence": "51.00%"})
        );
    }

    #[test]
    fn test_ping_message() {
        assert_eq!(PingResponse::default().message, "API is working");
    }
}
