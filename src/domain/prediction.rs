//! Prediction result types.
//!
//! Represents the output of the PCOS classifier for a single request.

use serde::{Deserialize, Serialize};

/// Decision threshold used when an artifact does not record its own.
pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.5;

/// Binary classifier decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    /// PCOS negative (class 0)
    Negative,
    /// PCOS positive (class 1)
    Positive,
}

impl Label {
    /// Label for a positive-class probability under `threshold`.
    #[must_use]
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability >= threshold {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    /// Numeric class as used at training time.
    #[must_use]
    pub fn as_class(&self) -> u8 {
        match self {
            Self::Negative => 0,
            Self::Positive => 1,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative => write!(f, "PCOS Negative"),
            Self::Positive => write!(f, "PCOS Positive"),
        }
    }
}

/// Result of one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Binary decision
    pub label: Label,

    /// Positive-class probability (0.0 to 1.0)
    pub probability: f64,
}

impl PredictionResult {
    #[must_use]
    pub fn new(label: Label, probability: f64) -> Self {
        Self { label, probability }
    }

    /// Probability of the predicted class.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        match self.label {
            Label::Positive => self.probability,
            Label::Negative => 1.0 - self.probability,
        }
    }

    /// One-line summary, e.g. `PCOS Positive - Probability: 0.83`.
    #[must_use]
    pub fn headline(&self) -> String {
        format!("{} - Probability: {:.2}", self.label, self.probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_threshold_is_inclusive() {
        assert_eq!(Label::from_probability(0.5, 0.5), Label::Positive);
        assert_eq!(Label::from_probability(0.4999, 0.5), Label::Negative);
        assert_eq!(Label::from_probability(0.3, 0.25), Label::Positive);
    }

    #[test]
    fn test_confidence() {
        let pos = PredictionResult::new(Label::Positive, 0.8);
        assert!((pos.confidence() - 0.8).abs() < f64::EPSILON);

        let neg = PredictionResult::new(Label::Negative, 0.2);
        assert!((neg.confidence() - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_headline() {
        let result = PredictionResult::new(Label::Positive, 0.834);
        assert_eq!(result.headline(), "PCOS Positive - Probability: 0.83");
        assert_eq!(Label::Negative.as_class(), 0);
    }
}
