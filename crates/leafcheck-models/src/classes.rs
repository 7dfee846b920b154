//! Class table for the deployed leaf classifier.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Internal labels in model output order.
///
/// Changing the model requires changing this list in lockstep.
pub const POTATO_CLASS_NAMES: [&str; 3] = [
    "Potato___Early_blight",
    "Potato___Late_blight",
    "Potato___healthy",
];

/// Organism prefix stripped from internal labels before they are shown.
pub const POTATO_LABEL_PREFIX: &str = "Potato___";

/// Ordered, immutable table of internal class labels.
///
/// Position `i` names score `i` of the model's output vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ClassNames(Vec<String>);

impl ClassNames {
    /// Create a table from labels in model output order.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// The three-class potato table.
    pub fn potato() -> Self {
        Self::new(POTATO_CLASS_NAMES)
    }

    /// Label at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for ClassNames {
    fn default() -> Self {
        Self::potato()
    }
}
