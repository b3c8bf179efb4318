//! Digest manifest utility for the exported artifacts.
//!
//! Writes `manifest.json` binding each artifact file name to its SHA-256
//! digest. The loader verifies artifacts against it at startup.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin hash_artifacts -- <artifact_dir>
//! cargo run --bin hash_artifacts -- <model.json> <scaler.json> [...]
//! ```
//!
//! With a directory, the default `best_rf_model.json` and `scaler.json` are
//! hashed. Explicit files must share one directory, where the manifest is
//! written.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use pcos_predict::adapters::artifacts::MANIFEST_FILE;
use pcos_predict::adapters::ArtifactManifest;
use pcos_predict::config::{DEFAULT_MODEL_FILE, DEFAULT_SCALER_FILE};

fn usage() -> String {
    "Usage: hash_artifacts <artifact_dir> | <artifact_file>...".to_string()
}

fn parse_args() -> Result<Vec<PathBuf>, String> {
    let mut paths = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage()),
            _ => paths.push(PathBuf::from(arg)),
        }
    }

    match paths.as_slice() {
        [] => Err(usage()),
        [dir] if dir.is_dir() => Ok(vec![
            dir.join(DEFAULT_MODEL_FILE),
            dir.join(DEFAULT_SCALER_FILE),
        ]),
        _ => Ok(paths),
    }
}

fn common_dir(files: &[PathBuf]) -> Result<PathBuf, String> {
    let dir_of = |p: &Path| {
        p.parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    };

    let dir = dir_of(&files[0]);
    if let Some(other) = files.iter().find(|p| dir_of(p) != dir) {
        return Err(format!(
            "All artifacts must live in one directory ({dir:?}), but {other:?} does not"
        ));
    }
    Ok(dir)
}

fn main() -> Result<(), String> {
    let files = parse_args()?;
    let dir = common_dir(&files)?;

    let manifest = ArtifactManifest::for_files(&files).map_err(|e| e.to_string())?;
    let json = serde_json::to_vec_pretty(&manifest)
        .map_err(|e| format!("Failed to serialize manifest: {e}"))?;

    let out = dir.join(MANIFEST_FILE);
    fs::write(&out, json).map_err(|e| format!("Failed to write {out:?}: {e}"))?;

    for (name, digest) in &manifest.files {
        println!("{digest}  {name}");
    }
    println!("Wrote {out:?}");
    Ok(())
}
