//! Startup configuration read from the environment.
//!
//! | Variable                          | Default                          |
//! |-----------------------------------|----------------------------------|
//! | `PCOS_ARTIFACT_DIR`               | directory of the executable      |
//! | `PCOS_MODEL_PATH`                 | `best_rf_model.json`             |
//! | `PCOS_SCALER_PATH`                | `scaler.json`                    |
//! | `PCOS_REQUIRE_ARTIFACT_MANIFEST`  | `false`                          |
//! | `PCOS_LOG_MODE`                   | `auto`                           |
//! | `PCOS_LOG_FILE`                   | `<artifact dir>/pcos-predict.log`|
//!
//! Relative artifact paths resolve against the artifact directory, so the
//! binary finds its artifacts no matter which directory it is started from.
//! Under `cargo run` the executable lives in `target/debug/`, so point the
//! binary at the bundled samples with `PCOS_ARTIFACT_DIR=models`.

use std::path::{Path, PathBuf};

pub const ARTIFACT_DIR_ENV: &str = "PCOS_ARTIFACT_DIR";
pub const MODEL_PATH_ENV: &str = "PCOS_MODEL_PATH";
pub const SCALER_PATH_ENV: &str = "PCOS_SCALER_PATH";
pub const REQUIRE_MANIFEST_ENV: &str = "PCOS_REQUIRE_ARTIFACT_MANIFEST";
pub const LOG_MODE_ENV: &str = "PCOS_LOG_MODE";
pub const LOG_FILE_ENV: &str = "PCOS_LOG_FILE";

pub const DEFAULT_MODEL_FILE: &str = "best_rf_model.json";
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";
pub const DEFAULT_LOG_FILE: &str = "pcos-predict.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when stdout is a terminal (the UI owns the screen), stdout otherwise.
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Resolved startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub artifact_dir: PathBuf,
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    pub require_manifest: bool,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok(), &install_dir())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// `install_dir` is used when no artifact directory is configured.
    pub fn from_lookup<F>(lookup: F, install_dir: &Path) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let artifact_dir = var(ARTIFACT_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| install_dir.to_path_buf());

        let resolve = |name: &str, default: &str| {
            let path = PathBuf::from(var(name).unwrap_or_else(|| default.to_string()));
            if path.is_absolute() {
                path
            } else {
                artifact_dir.join(path)
            }
        };

        let model_path = resolve(MODEL_PATH_ENV, DEFAULT_MODEL_FILE);
        let scaler_path = resolve(SCALER_PATH_ENV, DEFAULT_SCALER_FILE);
        let log_file = var(LOG_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| artifact_dir.join(DEFAULT_LOG_FILE));

        Self {
            model_path,
            scaler_path,
            require_manifest: var(REQUIRE_MANIFEST_ENV).is_some_and(|v| parse_bool(&v)),
            log_mode: var(LOG_MODE_ENV)
                .map(|v| LogMode::parse(&v))
                .unwrap_or_default(),
            log_file,
            artifact_dir,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

/// Directory containing the running executable, or `.` if unknown.
fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned(), Path::new("/opt/pcos"))
    }

    #[test]
    fn test_defaults_resolve_against_install_dir() {
        let cfg = config(&[]);
        assert_eq!(cfg.artifact_dir, PathBuf::from("/opt/pcos"));
        assert_eq!(cfg.model_path, PathBuf::from("/opt/pcos/best_rf_model.json"));
        assert_eq!(cfg.scaler_path, PathBuf::from("/opt/pcos/scaler.json"));
        assert_eq!(cfg.log_file, PathBuf::from("/opt/pcos/pcos-predict.log"));
        assert!(!cfg.require_manifest);
        assert_eq!(cfg.log_mode, LogMode::Auto);
    }

    #[test]
    fn test_relative_paths_use_artifact_dir() {
        let cfg = config(&[
            (ARTIFACT_DIR_ENV, "/srv/artifacts"),
            (MODEL_PATH_ENV, "v2/model.json"),
            (SCALER_PATH_ENV, "/etc/pcos/scaler.json"),
        ]);
        assert_eq!(cfg.model_path, PathBuf::from("/srv/artifacts/v2/model.json"));
        assert_eq!(cfg.scaler_path, PathBuf::from("/etc/pcos/scaler.json"));
    }

    #[test]
    fn test_empty_values_fall_back() {
        let cfg = config(&[(ARTIFACT_DIR_ENV, "  "), (MODEL_PATH_ENV, "")]);
        assert_eq!(cfg.model_path, PathBuf::from("/opt/pcos/best_rf_model.json"));
    }

    #[test]
    fn test_require_manifest_flag() {
        for (value, expected) in [("1", true), ("TRUE", true), ("yes", true), ("0", false), ("no", false)] {
            let cfg = config(&[(REQUIRE_MANIFEST_ENV, value)]);
            assert_eq!(cfg.require_manifest, expected, "value {value}");
        }
    }

    #[test]
    fn test_relative_artifact_dir_finds_bundled_models() {
        let cfg = config(&[(ARTIFACT_DIR_ENV, "models")]);
        assert_eq!(cfg.model_path, PathBuf::from("models/best_rf_model.json"));

        let store = crate::ArtifactStore::load(&cfg.model_path, &cfg.scaler_path)
            .expect("bundled artifacts load");
        assert_eq!(store.feature_importances().len(), 4);
    }

    #[test]
    fn test_log_mode() {
        assert_eq!(config(&[(LOG_MODE_ENV, "file")]).log_mode, LogMode::File);
        assert_eq!(config(&[(LOG_MODE_ENV, "Stdout")]).log_mode, LogMode::Stdout);
        assert_eq!(config(&[(LOG_MODE_ENV, "bogus")]).log_mode, LogMode::Auto);

        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
    }
}
