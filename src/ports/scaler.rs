//! Scaler port: Trait for the feature transform learned at training time.

/// Trait for a fitted feature scaler.
pub trait FeatureScaler: Send + Sync {
    /// Number of features the scaler was fit on.
    fn n_features(&self) -> usize;

    /// Column names seen at fit time, when the artifact recorded them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Apply the transform. Callers guarantee `x.len() == self.n_features()`.
    fn transform(&self, x: &[f64]) -> Vec<f64>;
}
