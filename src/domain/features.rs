//! Hormone inputs and the feature schema for PCOS prediction.
//!
//! The classifier and scaler were fit on four features in a fixed order:
//! `beta_HCG_I`, `beta_HCG_II`, `AMH`, `beta_HCG_ratio`. The last one is
//! derived from the first two. The order lives in [`Feature::ALL`] and the
//! positional array is produced only by [`FeatureVector::to_array`].

use serde::{Deserialize, Serialize};

/// Default value for each measurement when the user leaves a field unset.
pub const DEFAULT_MEASUREMENT: f64 = 1.0;

/// Number of features the models consume.
pub const FEATURE_COUNT: usize = 4;

/// Named features in training order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    BetaHcgI,
    BetaHcgII,
    Amh,
    BetaHcgRatio,
}

impl Feature {
    /// All features, in the order the artifacts were fit on.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::BetaHcgI,
        Feature::BetaHcgII,
        Feature::Amh,
        Feature::BetaHcgRatio,
    ];

    /// Column name used at training time.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::BetaHcgI => "beta_HCG_I",
            Self::BetaHcgII => "beta_HCG_II",
            Self::Amh => "AMH",
            Self::BetaHcgRatio => "beta_HCG_ratio",
        }
    }

    /// Position in the feature vector.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::BetaHcgI => 0,
            Self::BetaHcgII => 1,
            Self::Amh => 2,
            Self::BetaHcgRatio => 3,
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Feature names in training order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["beta_HCG_I", "beta_HCG_II", "AMH", "beta_HCG_ratio"];

/// Errors raised when raw measurements violate the input domain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be >= 0 (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f64 },
}

/// Raw measurements entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HormoneInputs {
    /// Beta HCG I in mIU/mL
    pub beta_hcg_i: f64,

    /// Beta HCG II in mIU/mL
    pub beta_hcg_ii: f64,

    /// Anti-Mullerian hormone in ng/mL
    pub amh: f64,
}

impl Default for HormoneInputs {
    fn default() -> Self {
        Self {
            beta_hcg_i: DEFAULT_MEASUREMENT,
            beta_hcg_ii: DEFAULT_MEASUREMENT,
            amh: DEFAULT_MEASUREMENT,
        }
    }
}

impl HormoneInputs {
    #[must_use]
    pub fn new(beta_hcg_i: f64, beta_hcg_ii: f64, amh: f64) -> Self {
        Self {
            beta_hcg_i,
            beta_hcg_ii,
            amh,
        }
    }

    /// Check that every measurement is finite and non-negative.
    ///
    /// Negative values are rejected, not clamped: hormone concentrations
    /// cannot be negative, so such a value is an entry error.
    ///
    /// # Errors
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            (Feature::BetaHcgI.name(), self.beta_hcg_i),
            (Feature::BetaHcgII.name(), self.beta_hcg_ii),
            (Feature::Amh.name(), self.amh),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite { field, value });
            }
            if value < 0.0 {
                return Err(ValidationError::Negative { field, value });
            }
        }
        Ok(())
    }
}

/// Derived ratio feature.
///
/// The denominator is `beta_hcg_i + 1`, which is at least 1 for every valid
/// input, so this never divides by zero.
#[must_use]
pub fn beta_hcg_ratio(beta_hcg_i: f64, beta_hcg_ii: f64) -> f64 {
    beta_hcg_ii / (beta_hcg_i + 1.0)
}

/// The four model features, as a typed record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub beta_hcg_i: f64,
    pub beta_hcg_ii: f64,
    pub amh: f64,
    pub beta_hcg_ratio: f64,
}

impl FeatureVector {
    /// Validate raw inputs and derive the ratio feature.
    ///
    /// # Errors
    /// Returns `ValidationError` for negative or non-finite measurements.
    pub fn from_inputs(inputs: &HormoneInputs) -> Result<Self, ValidationError> {
        inputs.validate()?;
        Ok(Self {
            beta_hcg_i: inputs.beta_hcg_i,
            beta_hcg_ii: inputs.beta_hcg_ii,
            amh: inputs.amh,
            beta_hcg_ratio: beta_hcg_ratio(inputs.beta_hcg_i, inputs.beta_hcg_ii),
        })
    }

    /// Value of a single feature.
    #[must_use]
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::BetaHcgI => self.beta_hcg_i,
            Feature::BetaHcgII => self.beta_hcg_ii,
            Feature::Amh => self.amh,
            Feature::BetaHcgRatio => self.beta_hcg_ratio,
        }
    }

    /// Positional array in training order.
    #[must_use]
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        Feature::ALL.map(|feature| self.get(feature))
    }
}

/// Feature vector after the scaler has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledVector(Vec<f64>);

impl ScaledVector {
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
