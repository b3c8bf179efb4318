//! Classifier port: Trait for a pre-trained binary classifier.
//!
//! This trait abstracts the exported model format from the application logic.

use crate::domain::{Label, DEFAULT_DECISION_THRESHOLD};

/// Trait for a trained binary classifier.
///
/// Implementations are immutable after construction. Callers guarantee that
/// `x.len() == self.n_features()`; the artifact store checks this before
/// delegating.
pub trait Classifier: Send + Sync {
    /// Number of features the classifier was fit on.
    fn n_features(&self) -> usize;

    /// Probability at or above which the positive label is returned.
    fn decision_threshold(&self) -> f64 {
        DEFAULT_DECISION_THRESHOLD
    }

    /// Positive-class probability for a scaled feature vector.
    fn predict_proba(&self, x: &[f64]) -> f64;

    /// Binary decision, consistent with `predict_proba`.
    fn predict_label(&self, x: &[f64]) -> Label {
        Label::from_probability(self.predict_proba(x), self.decision_threshold())
    }

    /// Per-feature importance scores, aligned with the training feature order.
    fn feature_importances(&self) -> Vec<f64>;
}
