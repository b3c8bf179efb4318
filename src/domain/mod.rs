//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O.
//! All types are serializable and implement strict validation.

mod features;
mod importance;
mod prediction;

pub use features::{
    beta_hcg_ratio, Feature, FeatureVector, HormoneInputs, ScaledVector, ValidationError,
    DEFAULT_MEASUREMENT, FEATURE_COUNT, FEATURE_NAMES,
};
pub use importance::{FeatureImportance, ImportanceRanking, TOP_IMPORTANCES};
pub use prediction::{Label, PredictionResult, DEFAULT_DECISION_THRESHOLD};
