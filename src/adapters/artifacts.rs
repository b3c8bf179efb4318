//! Artifact loading: reads the exported classifier and scaler from disk.
//!
//! # Integrity
//!
//! An optional `manifest.json` next to the model artifact binds artifact
//! file names to SHA-256 digests:
//!
//! ```json
//! {"version": 1, "files": {"best_rf_model.json": "ab12...", "scaler.json": "cd34..."}}
//! ```
//!
//! When a manifest is present every loaded artifact must be listed in it and
//! match its digest. Use the `hash_artifacts` binary to produce one.
//! Digests are computed over the same bytes that are parsed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::sklearn::{ExportedClassifier, ExportedScaler};
use crate::ports::{Classifier, FeatureScaler};

/// File name of the digest manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Supported manifest version.
pub const MANIFEST_VERSION: u32 = 1;

/// Errors raised while loading artifacts. All of them are startup-fatal.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactLoadError {
    #[error("Artifact not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid artifact {path:?}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    #[error("Digest mismatch for {file}")]
    DigestMismatch { file: String },

    #[error("Artifact manifest required but not found at {path:?}")]
    ManifestMissing { path: PathBuf },

    #[error("Artifact {file} is not listed in {manifest:?}")]
    Unbound { file: String, manifest: PathBuf },
}

/// Digest manifest binding artifact file names to SHA-256 hex digests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    pub files: BTreeMap<String, String>,
}

impl ArtifactManifest {
    /// Build a manifest for the given files, keyed by file name.
    ///
    /// # Errors
    /// Returns error if a file cannot be read.
    pub fn for_files(paths: &[PathBuf]) -> Result<Self, ArtifactLoadError> {
        let mut files = BTreeMap::new();
        for path in paths {
            let bytes = read_bytes(path)?;
            files.insert(file_key(path), sha256_hex(&bytes));
        }
        Ok(Self {
            version: MANIFEST_VERSION,
            files,
        })
    }
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn file_key(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ArtifactLoadError> {
    if !path.exists() {
        return Err(ArtifactLoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    fs::read(path).map_err(|source| ArtifactLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads and validates the classifier and scaler artifacts.
#[derive(Debug, Clone, Default)]
pub struct ArtifactLoader {
    require_manifest: bool,
}

impl ArtifactLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse to load when no `manifest.json` sits next to the model.
    #[must_use]
    pub fn require_manifest(mut self, require: bool) -> Self {
        self.require_manifest = require;
        self
    }

    /// Load both artifacts. Either both succeed or an error is returned.
    ///
    /// # Errors
    /// Returns `ArtifactLoadError` if a file is missing, unreadable, malformed,
    /// structurally invalid, or fails digest verification.
    pub fn load(
        &self,
        model_path: &Path,
        scaler_path: &Path,
    ) -> Result<(ExportedClassifier, ExportedScaler), ArtifactLoadError> {
        let model_bytes = read_bytes(model_path)?;
        let scaler_bytes = read_bytes(scaler_path)?;

        self.verify_digests(
            model_path,
            &[
                (model_path, model_bytes.as_slice()),
                (scaler_path, scaler_bytes.as_slice()),
            ],
        )?;

        let classifier: ExportedClassifier =
            serde_json::from_slice(&model_bytes).map_err(|source| ArtifactLoadError::Malformed {
                path: model_path.to_path_buf(),
                source,
            })?;
        let classifier = classifier
            .finalize()
            .map_err(|reason| ArtifactLoadError::Invalid {
                path: model_path.to_path_buf(),
                reason,
            })?;

        let scaler: ExportedScaler =
            serde_json::from_slice(&scaler_bytes).map_err(|source| ArtifactLoadError::Malformed {
                path: scaler_path.to_path_buf(),
                source,
            })?;
        scaler
            .validate()
            .map_err(|reason| ArtifactLoadError::Invalid {
                path: scaler_path.to_path_buf(),
                reason,
            })?;

        tracing::info!(
            "Loaded artifacts: classifier={} ({} features) from {:?}, scaler={} ({} features) from {:?}",
            classifier.kind(),
            classifier.n_features(),
            model_path,
            scaler.kind(),
            scaler.n_features(),
            scaler_path
        );

        Ok((classifier, scaler))
    }

    /// Check artifacts against `manifest.json` in the model's directory.
    fn verify_digests(
        &self,
        model_path: &Path,
        artifacts: &[(&Path, &[u8])],
    ) -> Result<(), ArtifactLoadError> {
        let dir = model_path.parent().unwrap_or_else(|| Path::new("."));
        let manifest_path = dir.join(MANIFEST_FILE);

        if !manifest_path.exists() {
            if self.require_manifest {
                tracing::error!("Artifact manifest not found at {:?}", manifest_path);
                return Err(ArtifactLoadError::ManifestMissing {
                    path: manifest_path,
                });
            }
            tracing::debug!("No artifact manifest at {:?}, skipping digest check", manifest_path);
            return Ok(());
        }

        let content = read_bytes(&manifest_path)?;
        let manifest: ArtifactManifest =
            serde_json::from_slice(&content).map_err(|source| ArtifactLoadError::Malformed {
                path: manifest_path.clone(),
                source,
            })?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ArtifactLoadError::Invalid {
                path: manifest_path,
                reason: format!("unsupported manifest version {}", manifest.version),
            });
        }

        for (path, bytes) in artifacts {
            let key = file_key(path);
            let expected = manifest
                .files
                .get(&key)
                .ok_or_else(|| ArtifactLoadError::Unbound {
                    file: key.clone(),
                    manifest: manifest_path.clone(),
                })?;
            if !sha256_hex(bytes).eq_ignore_ascii_case(expected.trim()) {
                tracing::error!("Digest mismatch for artifact {}", key);
                return Err(ArtifactLoadError::DigestMismatch { file: key });
            }
        }

        tracing::info!("Verified artifact digests against {:?}", manifest_path);
        Ok(())
    }
}
