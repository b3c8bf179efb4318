//! Artifact store: the trained classifier and scaler, immutable after load.
//!
//! The store is built once at startup and shared by reference (or `Arc`)
//! with every request. Nothing in it is mutated after construction, so it
//! is `Send + Sync` without locks.

use std::path::Path;

use crate::adapters::sklearn::{ExportedClassifier, ExportedScaler};
use crate::adapters::{ArtifactLoadError, ArtifactLoader};
use crate::domain::{FeatureVector, Label, ScaledVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::{Classifier, FeatureScaler};
use crate::PredictError;

/// Owns the classifier and scaler artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore<C = ExportedClassifier, S = ExportedScaler> {
    classifier: C,
    scaler: S,
}

impl ArtifactStore {
    /// Load both artifacts from disk.
    ///
    /// # Errors
    /// Returns `ArtifactLoadError` if either artifact is missing or invalid.
    /// No store is built unless both load.
    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self, ArtifactLoadError> {
        Self::load_with(&ArtifactLoader::new(), model_path, scaler_path)
    }

    /// Load both artifacts with an explicitly configured loader.
    ///
    /// # Errors
    /// Returns `ArtifactLoadError` if either artifact is missing or invalid.
    pub fn load_with(
        loader: &ArtifactLoader,
        model_path: &Path,
        scaler_path: &Path,
    ) -> Result<Self, ArtifactLoadError> {
        let (classifier, scaler) = loader.load(model_path, scaler_path)?;
        Ok(Self::new(classifier, scaler))
    }
}

impl<C, S> ArtifactStore<C, S>
where
    C: Classifier,
    S: FeatureScaler,
{
    /// Build a store from artifacts that are already in memory.
    #[must_use]
    pub fn new(classifier: C, scaler: S) -> Self {
        Self { classifier, scaler }
    }

    #[must_use]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    #[must_use]
    pub fn scaler(&self) -> &S {
        &self.scaler
    }

    /// Apply the scaler to a feature vector.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the scaler was fit on a different
    /// number of features, or `FeatureOrder` if it recorded different
    /// feature names.
    pub fn transform(&self, features: &FeatureVector) -> Result<ScaledVector, PredictError> {
        let expected = self.scaler.n_features();
        if expected != FEATURE_COUNT {
            return Err(PredictError::DimensionMismatch {
                stage: "scaler",
                expected,
                actual: FEATURE_COUNT,
            });
        }

        if let Some(names) = self.scaler.feature_names() {
            if !names.iter().map(String::as_str).eq(FEATURE_NAMES) {
                return Err(PredictError::FeatureOrder {
                    expected: names.to_vec(),
                    actual: FEATURE_NAMES.iter().map(|n| (*n).to_string()).collect(),
                });
            }
        }

        // Large finite inputs can overflow once scaled.
        let scaled = self.scaler.transform(&features.to_array());
        if let Some(index) = scaled.iter().position(|v| !v.is_finite()) {
            return Err(PredictError::NonFiniteFeature {
                stage: "scaler",
                index,
            });
        }

        Ok(ScaledVector::new(scaled))
    }

    fn check_classifier_arity(&self, scaled: &ScaledVector) -> Result<(), PredictError> {
        let expected = self.classifier.n_features();
        if scaled.len() != expected {
            return Err(PredictError::DimensionMismatch {
                stage: "classifier",
                expected,
                actual: scaled.len(),
            });
        }
        Ok(())
    }

    /// Binary decision for a scaled vector.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the classifier expects another arity.
    pub fn predict_label(&self, scaled: &ScaledVector) -> Result<Label, PredictError> {
        self.check_classifier_arity(scaled)?;
        Ok(self.classifier.predict_label(scaled.as_slice()))
    }

    /// Positive-class probability for a scaled vector.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the classifier expects another arity,
    /// or `InvalidProbability` if the result is NaN or outside [0, 1].
    pub fn predict_probability(&self, scaled: &ScaledVector) -> Result<f64, PredictError> {
        self.check_classifier_arity(scaled)?;
        let value = self.classifier.predict_proba(scaled.as_slice());
        if !(0.0..=1.0).contains(&value) {
            return Err(PredictError::InvalidProbability { value });
        }
        Ok(value)
    }

    /// Importance scores aligned with the classifier's training features.
    #[must_use]
    pub fn feature_importances(&self) -> Vec<f64> {
        self.classifier.feature_importances()
    }
}
