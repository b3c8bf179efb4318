//! Ports layer: Trait definitions for the trained artifacts.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and the exported model formats, so the pipeline
//! can run against test doubles.

mod classifier;
mod scaler;

pub use classifier::Classifier;
pub use scaler::FeatureScaler;
