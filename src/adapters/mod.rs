//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the integration with the outside world:
//! - `sklearn`: exported classifier and scaler formats
//! - `artifacts`: loading artifacts from disk with digest verification
//! - `sanitize`: measurement filtering for logs

pub mod artifacts;
pub mod sanitize;
pub mod sklearn;

// Re-export load error for lib.rs
pub use artifacts::{ArtifactLoadError, ArtifactLoader, ArtifactManifest};
