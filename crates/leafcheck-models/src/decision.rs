//! Classification decision models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of classifying one leaf image.
///
/// `confidence_percent` is the raw top score times 100 at full precision.
/// It is not clamped, so a model that does not emit a probability
/// distribution can produce values outside `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Decision {
    /// Top score cleared the confidence gate.
    Classified {
        label: String,
        confidence_percent: f64,
    },
    /// Top score fell below the confidence gate; no label is released.
    Uncertain { confidence_percent: f64 },
}

impl Decision {
    pub fn classified(label: impl Into<String>, confidence_percent: f64) -> Self {
        Self::Classified {
            label: label.into(),
            confidence_percent,
        }
    }

    pub fn uncertain(confidence_percent: f64) -> Self {
        Self::Uncertain { confidence_percent }
    }

    pub fn status(&self) -> DecisionStatus {
        match self {
            Decision::Classified { .. } => DecisionStatus::Classified,
            Decision::Uncertain { .. } => DecisionStatus::Uncertain,
        }
    }

    pub fn confidence_percent(&self) -> f64 {
        match self {
            Decision::Classified {
                confidence_percent, ..
            }
            | Decision::Uncertain { confidence_percent } => *confidence_percent,
        }
    }

    /// Released label, `None` when uncertain.
    pub fn label(&self) -> Option<&str> {
        match self {
            Decision::Classified { label, .. } => Some(label),
            Decision::Uncertain { .. } => None,
        }
    }

    pub fn is_uncertain(&self) -> bool {
        matches!(self, Decision::Uncertain { .. })
    }
}

/// Decision shape without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Classified,
    Uncertain,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Classified => "classified",
            DecisionStatus::Uncertain => "uncertain",
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
