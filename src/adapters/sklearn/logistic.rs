//! Logistic regression classifier exported from scikit-learn.

use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_DECISION_THRESHOLD;
use crate::ports::Classifier;

/// Exported binary `LogisticRegression` (`coef_` flattened to one row).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedLogistic {
    pub n_features_in: usize,
    pub coef: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub decision_threshold: Option<f64>,
    /// scikit-learn does not expose importances for linear models; when
    /// absent, normalised absolute coefficients are used.
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
}

impl ExportedLogistic {
    /// Validate parameters and resolve feature importances.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn finalize(mut self) -> Result<Self, String> {
        if self.n_features_in == 0 {
            return Err("n_features_in must be > 0".into());
        }
        if self.coef.len() != self.n_features_in {
            return Err(format!(
                "coef has {} entries, expected {}",
                self.coef.len(),
                self.n_features_in
            ));
        }
        if self.coef.iter().any(|c| !c.is_finite()) || !self.intercept.is_finite() {
            return Err("coefficients must be finite".into());
        }
        if let Some(t) = self.decision_threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(format!("decision_threshold {t} outside [0, 1]"));
            }
        }

        let importances = self.feature_importances.take().unwrap_or_else(|| {
            let total: f64 = self.coef.iter().map(|c| c.abs()).sum();
            if total > 0.0 {
                self.coef.iter().map(|c| c.abs() / total).collect()
            } else {
                vec![0.0; self.n_features_in]
            }
        });
        if importances.len() != self.n_features_in {
            return Err(format!(
                "feature_importances has {} entries, expected {}",
                importances.len(),
                self.n_features_in
            ));
        }
        if importances.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err("feature_importances must be finite and >= 0".into());
        }
        self.feature_importances = Some(importances);

        Ok(self)
    }

    fn decision_function(&self, x: &[f64]) -> f64 {
        self.coef
            .iter()
            .zip(x)
            .map(|(w, v)| w * v)
            .sum::<f64>()
            + self.intercept
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for ExportedLogistic {
    fn n_features(&self) -> usize {
        self.n_features_in
    }

    fn decision_threshold(&self) -> f64 {
        self.decision_threshold.unwrap_or(DEFAULT_DECISION_THRESHOLD)
    }

    fn predict_proba(&self, x: &[f64]) -> f64 {
        sigmoid(self.decision_function(x))
    }

    fn feature_importances(&self) -> Vec<f64> {
        self.feature_importances
            .clone()
            .unwrap_or_else(|| vec![0.0; self.n_features_in])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Label;

    fn model() -> ExportedLogistic {
        ExportedLogistic {
            n_features_in: 2,
            coef: vec![2.0, -1.0],
            intercept: 0.0,
            decision_threshold: None,
            feature_importances: None,
        }
        .finalize()
        .expect("valid")
    }

    #[test]
    fn test_probability_at_boundary() {
        let m = model();
        assert!((m.predict_proba(&[0.0, 0.0]) - 0.5).abs() < 1e-12);
        assert_eq!(m.predict_label(&[0.0, 0.0]), Label::Positive);
        assert!(m.predict_proba(&[3.0, 0.0]) > 0.99);
        assert_eq!(m.predict_label(&[-1.0, 0.0]), Label::Negative);
    }

    #[test]
    fn test_default_importances_from_coefficients() {
        let imp = model().feature_importances();
        assert!((imp[0] - 2.0 / 3.0).abs() < 1e-12);
        assert!((imp[1] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_custom_threshold() {
        let m = ExportedLogistic {
            decision_threshold: Some(0.9),
            ..model()
        }
        .finalize()
        .expect("valid");
        assert_eq!(m.predict_label(&[0.5, 0.0]), Label::Negative);
    }

    #[test]
    fn test_rejects_coef_length() {
        let err = ExportedLogistic {
            n_features_in: 3,
            ..model()
        }
        .finalize()
        .expect_err("length mismatch");
        assert!(err.contains("coef has 2 entries"));
    }
}
