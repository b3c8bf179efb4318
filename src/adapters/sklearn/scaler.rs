//! Feature scalers exported from scikit-learn.

use serde::{Deserialize, Serialize};

use crate::ports::FeatureScaler;

fn check_names(names: Option<&Vec<String>>, n_features: usize) -> Result<(), String> {
    match names {
        Some(names) if names.len() != n_features => Err(format!(
            "feature_names_in has {} entries, expected {n_features}",
            names.len()
        )),
        _ => Ok(()),
    }
}

fn check_len(field: &str, values: &[f64], n_features: usize) -> Result<(), String> {
    if values.len() != n_features {
        return Err(format!(
            "{field} has {} entries, expected {n_features}",
            values.len()
        ));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(format!("{field} must be finite"));
    }
    Ok(())
}

/// Exported `StandardScaler`: `(x - mean) / scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub n_features_in: usize,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default)]
    pub feature_names_in: Option<Vec<String>>,
}

impl StandardScaler {
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn validate(&self) -> Result<(), String> {
        if self.n_features_in == 0 {
            return Err("n_features_in must be > 0".into());
        }
        check_len("mean", &self.mean, self.n_features_in)?;
        check_len("scale", &self.scale, self.n_features_in)?;
        if self.scale.iter().any(|s| *s == 0.0) {
            return Err("scale must be non-zero".into());
        }
        check_names(self.feature_names_in.as_ref(), self.n_features_in)
    }
}

impl FeatureScaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.n_features_in
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names_in.as_deref()
    }

    fn transform(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(v, (mean, scale))| (v - mean) / scale)
            .collect()
    }
}

/// Exported `MinMaxScaler`: `x * scale + min`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub n_features_in: usize,
    pub min: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default)]
    pub feature_names_in: Option<Vec<String>>,
}

impl MinMaxScaler {
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn validate(&self) -> Result<(), String> {
        if self.n_features_in == 0 {
            return Err("n_features_in must be > 0".into());
        }
        check_len("min", &self.min, self.n_features_in)?;
        check_len("scale", &self.scale, self.n_features_in)?;
        check_names(self.feature_names_in.as_ref(), self.n_features_in)
    }
}

impl FeatureScaler for MinMaxScaler {
    fn n_features(&self) -> usize {
        self.n_features_in
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names_in.as_deref()
    }

    fn transform(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(self.min.iter().zip(&self.scale))
            .map(|(v, (min, scale))| v * scale + min)
            .collect()
    }
}
