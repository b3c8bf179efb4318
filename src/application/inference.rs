//! Inference pipeline: raw measurements in, prediction and importances out.
//!
//! The pipeline:
//! - Validates the three measurements
//! - Derives `beta_HCG_ratio` and assembles the feature vector
//! - Scales it with the stored scaler
//! - Classifies with the stored classifier
//! - Ranks the classifier's feature importances for display

use std::sync::Arc;

use crate::adapters::sklearn::{ExportedClassifier, ExportedScaler};
use crate::application::ArtifactStore;
use crate::domain::{
    FeatureVector, HormoneInputs, ImportanceRanking, PredictionResult, ValidationError,
    FEATURE_NAMES, TOP_IMPORTANCES,
};
use crate::ports::{Classifier, FeatureScaler};
use crate::PredictError;

/// Service for running PCOS inference against an injected artifact store.
pub struct InferencePipeline<C = ExportedClassifier, S = ExportedScaler>
where
    C: Classifier,
    S: FeatureScaler,
{
    store: Arc<ArtifactStore<C, S>>,
}

impl<C, S> Clone for InferencePipeline<C, S>
where
    C: Classifier,
    S: FeatureScaler,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<C, S> InferencePipeline<C, S>
where
    C: Classifier,
    S: FeatureScaler,
{
    /// Create a new pipeline over a shared store.
    pub fn new(store: Arc<ArtifactStore<C, S>>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &ArtifactStore<C, S> {
        &self.store
    }

    /// Validate inputs and build the feature vector in training order.
    ///
    /// # Errors
    /// Returns `ValidationError` for negative or non-finite measurements.
    pub fn feature_vector(&self, inputs: &HormoneInputs) -> Result<FeatureVector, ValidationError> {
        FeatureVector::from_inputs(inputs)
    }

    /// Run the full pipeline for one request.
    ///
    /// # Errors
    /// Returns `Validation` for invalid inputs, and `DimensionMismatch` or
    /// `FeatureOrder` when the artifacts were fit on another feature set.
    pub fn infer(&self, inputs: &HormoneInputs) -> Result<PredictionResult, PredictError> {
        tracing::debug!(
            beta_HCG_I = inputs.beta_hcg_i,
            beta_HCG_II = inputs.beta_hcg_ii,
            AMH = inputs.amh,
            "Running inference"
        );

        let features = self.feature_vector(inputs)?;
        tracing::debug!(beta_HCG_ratio = features.beta_hcg_ratio, "Derived ratio feature");

        let scaled = self.store.transform(&features)?;
        let label = self.store.predict_label(&scaled)?;
        let probability = self.store.predict_probability(&scaled)?;

        tracing::info!(
            "Inference complete: prediction={}, probability={:.2}",
            label.as_class(),
            probability
        );

        Ok(PredictionResult::new(label, probability))
    }

    /// Feature importances sorted descending, top entries only.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the classifier reports a different
    /// number of importances than there are features.
    pub fn rank_importances(&self) -> Result<ImportanceRanking, PredictError> {
        let scores = self.store.feature_importances();
        if scores.len() != FEATURE_NAMES.len() {
            return Err(PredictError::DimensionMismatch {
                stage: "feature importances",
                expected: scores.len(),
                actual: FEATURE_NAMES.len(),
            });
        }
        Ok(ImportanceRanking::from_scores(
            &FEATURE_NAMES,
            &scores,
            TOP_IMPORTANCES,
        ))
    }
}
