//! Model formats exported by the training pipeline (scikit-learn).
//!
//! Artifacts are JSON documents tagged by `kind`:
//!
//! ```json
//! {"kind": "random_forest", "n_features_in": 4, "classes": [0, 1], "estimators": [...]}
//! {"kind": "standard_scaler", "n_features_in": 4, "mean": [...], "scale": [...]}
//! ```

mod forest;
mod logistic;
mod scaler;

use serde::{Deserialize, Serialize};

use crate::ports::{Classifier, FeatureScaler};

pub use forest::{ExportedForest, ExportedTree, TREE_LEAF};
pub use logistic::ExportedLogistic;
pub use scaler::{MinMaxScaler, StandardScaler};

/// Any supported classifier artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportedClassifier {
    RandomForest(ExportedForest),
    LogisticRegression(ExportedLogistic),
}

impl ExportedClassifier {
    /// Validate and resolve derived fields after deserialization.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn finalize(self) -> Result<Self, String> {
        match self {
            Self::RandomForest(m) => m.finalize().map(Self::RandomForest),
            Self::LogisticRegression(m) => m.finalize().map(Self::LogisticRegression),
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RandomForest(_) => "random_forest",
            Self::LogisticRegression(_) => "logistic_regression",
        }
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            Self::RandomForest(m) => m,
            Self::LogisticRegression(m) => m,
        }
    }
}

impl Classifier for ExportedClassifier {
    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn decision_threshold(&self) -> f64 {
        self.inner().decision_threshold()
    }

    fn predict_proba(&self, x: &[f64]) -> f64 {
        self.inner().predict_proba(x)
    }

    fn feature_importances(&self) -> Vec<f64> {
        self.inner().feature_importances()
    }
}

/// Any supported scaler artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportedScaler {
    StandardScaler(StandardScaler),
    MinMaxScaler(MinMaxScaler),
}

impl ExportedScaler {
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::StandardScaler(s) => s.validate(),
            Self::MinMaxScaler(s) => s.validate(),
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StandardScaler(_) => "standard_scaler",
            Self::MinMaxScaler(_) => "min_max_scaler",
        }
    }

    fn inner(&self) -> &dyn FeatureScaler {
        match self {
            Self::StandardScaler(s) => s,
            Self::MinMaxScaler(s) => s,
        }
    }
}

impl FeatureScaler for ExportedScaler {
    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.inner().feature_names()
    }

    fn transform(&self, x: &[f64]) -> Vec<f64> {
        self.inner().transform(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_classifier_json() {
        let json = r#"{
            "kind": "logistic_regression",
            "n_features_in": 2,
            "coef": [1.0, 1.0],
            "intercept": -1.0
        }"#;
        let model: ExportedClassifier = serde_json::from_str(json).expect("parse");
        let model = model.finalize().expect("valid");
        assert_eq!(model.kind(), "logistic_regression");
        assert_eq!(model.n_features(), 2);
        assert!((model.predict_proba(&[0.5, 0.5]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_tagged_scaler_json() {
        let json = r#"{
            "kind": "standard_scaler",
            "n_features_in": 1,
            "mean": [2.0],
            "scale": [4.0]
        }"#;
        let scaler: ExportedScaler = serde_json::from_str(json).expect("parse");
        scaler.validate().expect("valid");
        assert_eq!(scaler.kind(), "standard_scaler");
        assert_eq!(scaler.transform(&[6.0]), vec![1.0]);
        assert!(scaler.feature_names().is_none());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let json = r#"{"kind": "svm", "n_features_in": 1}"#;
        assert!(serde_json::from_str::<ExportedClassifier>(json).is_err());
    }
}
