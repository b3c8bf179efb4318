//! # pcos-predict
//!
//! PCOS risk prediction from three hormone measurements using a pre-trained
//! classifier and feature scaler exported from the training environment.
//!
//! This crate provides:
//! - A typed feature schema with the derived `beta_HCG_ratio` feature
//! - An immutable artifact store (classifier + scaler) loaded once at startup
//! - An inference pipeline producing a prediction and a ranked importance view
//! - Terminal UI for local use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (HormoneInputs, FeatureVector, PredictionResult, ImportanceRanking)
//! - `ports`: Trait definitions for the artifacts (Classifier, FeatureScaler)
//! - `adapters`: Concrete artifact formats, loading, log sanitization
//! - `application`: Artifact store and inference pipeline
//! - `config`: Environment-driven startup configuration
//! - `tui`: Terminal user interface
//!
//! ## Running from a checkout
//!
//! Artifacts are looked up next to the executable by default. From a source
//! checkout, use the bundled samples:
//!
//! ```bash
//! PCOS_ARTIFACT_DIR=models cargo run --bin pcos-predict
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use adapters::ArtifactLoadError;
pub use application::{ArtifactStore, InferencePipeline};
pub use domain::{
    FeatureVector, HormoneInputs, ImportanceRanking, Label, PredictionResult, ValidationError,
};

/// Result type for prediction operations
pub type Result<T> = std::result::Result<T, PredictError>;

/// Main error type for pcos-predict
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("Artifact load failed: {0}")]
    ArtifactLoad(#[from] ArtifactLoadError),

    #[error("Dimension mismatch in {stage}: artifact expects {expected} features, got {actual}")]
    DimensionMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Feature order mismatch: artifact was fit on {expected:?}, pipeline supplies {actual:?}")]
    FeatureOrder {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Non-finite value at feature {index} after {stage}")]
    NonFiniteFeature { stage: &'static str, index: usize },

    #[error("Classifier produced a probability outside [0, 1]: {value}")]
    InvalidProbability { value: f64 },

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}
