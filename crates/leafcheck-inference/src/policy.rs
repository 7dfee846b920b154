//! Confidence policy turning raw model scores into a decision.

use leafcheck_models::{ClassNames, Decision};

use crate::config::PolicyConfig;
use crate::error::{InferenceError, InferenceResult};

/// Argmax + confidence gate + label cleanup.
///
/// Pure: no state is carried between calls.
#[derive(Debug, Clone)]
pub struct ClassificationPolicy {
    config: PolicyConfig,
}

impl ClassificationPolicy {
    pub fn new(config: PolicyConfig) -> InferenceResult<Self> {
        if config.class_names.is_empty() {
            return Err(InferenceError::config("class table is empty"));
        }
        if !config.threshold_percent.is_finite() {
            return Err(InferenceError::config(format!(
                "confidence threshold must be finite, got {}",
                config.threshold_percent
            )));
        }
        Ok(Self { config })
    }

    pub fn class_names(&self) -> &ClassNames {
        &self.config.class_names
    }

    pub fn threshold_percent(&self) -> f64 {
        self.config.threshold_percent
    }

    /// Decide on one image's scores.
    ///
    /// The confidence is the top score times 100, neither renormalized nor
    /// clamped. Scores below the threshold (strictly) never release a label.
    pub fn decide(&self, scores: &[f32]) -> Decision {
        let Some((index, score)) = argmax(scores) else {
            return Decision::uncertain(0.0);
        };

        let confidence_percent = f64::from(score) * 100.0;
        if confidence_percent.is_nan() || confidence_percent < self.config.threshold_percent {
            return Decision::uncertain(confidence_percent);
        }

        match self.config.class_names.get(index) {
            Some(raw) => Decision::classified(self.clean_label(raw), confidence_percent),
            None => Decision::uncertain(confidence_percent),
        }
    }

    /// `"Potato___Late_blight"` -> `"Late blight"`.
    pub fn clean_label(&self, raw: &str) -> String {
        raw.strip_prefix(self.config.label_prefix.as_str())
            .unwrap_or(raw)
            .replace(self.config.separator, " ")
    }
}

/// Index and value of the largest score. Ties go to the lowest index and
/// NaN never wins a comparison.
fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    let mut iter = scores.iter().copied().enumerate();
    let first = iter.next()?;
    Some(iter.fold(first, |best, (i, v)| {
        if v > best.1 || (best.1.is_nan() && !v.is_nan()) {
            (i, v)
        } else {
            best
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafcheck_models::DecisionStatus;

    fn policy() -> ClassificationPolicy {
        ClassificationPolicy::new(PolicyConfig::default()).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_healthy_leaf_is_classified() {
        let decision = policy().decide(&[0.1, 0.2, 0.7]);
        assert_eq!(decision.label(), Some("healthy"));
        assert_close(decision.confidence_percent(), 70.0);
    }

    #[test]
    fn test_label_cleanup() {
        let policy = policy();
        assert_eq!(policy.clean_label("Potato___Late_blight"), "Late blight");
        assert_eq!(policy.clean_label("Potato___Early_blight"), "Early blight");
        assert_eq!(policy.clean_label("Potato___healthy"), "healthy");
        assert_eq!(policy.clean_label("Tomato_leaf_mold"), "Tomato leaf mold");
    }

    #[test]
    fn test_below_threshold_is_uncertain_for_every_index() {
        let policy = policy();
        for top in 0..3 {
            let mut scores = vec![0.2f32; 3];
            scores[top] = 0.6;
            let decision = policy.decide(&scores);
            assert_eq!(decision.status(), DecisionStatus::Uncertain);
            assert_close(decision.confidence_percent(), 60.0);
        }
    }

    #[test]
    fn test_at_or_above_threshold_is_classified_with_argmax_label() {
        let policy = policy();
        let expected = ["Early blight", "Late blight", "healthy"];
        for (top, label) in expected.iter().enumerate() {
            let mut scores = vec![0.05f32; 3];
            scores[top] = 0.9;
            assert_eq!(policy.decide(&scores).label(), Some(*label));
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let config = PolicyConfig {
            threshold_percent: 50.0,
            ..PolicyConfig::default()
        };
        let policy = ClassificationPolicy::new(config).unwrap();
        // 0.5 is exact in binary, so the confidence lands exactly on the gate.
        let decision = policy.decide(&[0.5, 0.25, 0.25]);
        assert_eq!(decision.label(), Some("Early blight"));
    }

    #[test]
    fn test_tie_selects_first_maximum() {
        let config = PolicyConfig {
            threshold_percent: 50.0,
            ..PolicyConfig::default()
        };
        let policy = ClassificationPolicy::new(config).unwrap();
        for _ in 0..10 {
            assert_eq!(policy.decide(&[0.5, 0.5, 0.0]).label(), Some("Early blight"));
        }
        assert_eq!(argmax(&[0.5, 0.5, 0.0]), Some((0, 0.5)));
    }

    #[test]
    fn test_tie_below_default_threshold_is_uncertain() {
        let decision = policy().decide(&[0.5, 0.5, 0.0]);
        assert!(decision.is_uncertain());
        assert_close(decision.confidence_percent(), 50.0);
    }

    #[test]
    fn test_confidence_above_100_passes_through() {
        let decision = policy().decide(&[0.1, 1.7, 0.4]);
        assert_eq!(decision.label(), Some("Late blight"));
        assert_close(decision.confidence_percent(), 170.0);
    }

    #[test]
    fn test_negative_confidence_passes_through() {
        let decision = policy().decide(&[-0.5, -0.2, -0.9]);
        assert!(decision.is_uncertain());
        assert_close(decision.confidence_percent(), -20.0);
    }

    #[test]
    fn test_nan_scores_never_classify() {
        assert!(policy().decide(&[f32::NAN; 3]).is_uncertain());
        let decision = policy().decide(&[f32::NAN, 0.9, 0.1]);
        assert_eq!(decision.label(), Some("Late blight"));
    }

    #[test]
    fn test_empty_scores_are_uncertain() {
        let decision = policy().decide(&[]);
        assert!(decision.is_uncertain());
        assert_close(decision.confidence_percent(), 0.0);
    }

    #[test]
    fn test_rejects_empty_class_table() {
        let config = PolicyConfig {
            class_names: ClassNames::new(Vec::<String>::new()),
            ..PolicyConfig::default()
        };
        assert!(matches!(
            ClassificationPolicy::new(config),
            Err(InferenceError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_non_finite_threshold() {
        let config = PolicyConfig {
            threshold_percent: f64::NAN,
            ..PolicyConfig::default()
        };
        assert!(ClassificationPolicy::new(config).is_err());
    }
}
