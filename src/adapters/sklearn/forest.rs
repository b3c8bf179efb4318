//! Random forest classifier exported from scikit-learn.
//!
//! Each estimator is stored in the array form of `sklearn.tree._tree.Tree`:
//! node `i` is a leaf when `children_left[i] == -1`, otherwise samples with
//! `x[feature[i]] <= threshold[i]` go left. `value[i]` holds the per-class
//! weights of the node, normalised to a distribution at prediction time.

use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_DECISION_THRESHOLD;
use crate::ports::Classifier;

/// Marker for "no child" in `children_left` / `children_right`.
pub const TREE_LEAF: i64 = -1;

/// Label of the positive class in `classes`.
const POSITIVE_CLASS: i64 = 1;

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

/// A single fitted decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights, `value[node][class]`.
    pub value: Vec<Vec<f64>>,
    #[serde(default)]
    pub impurity: Option<Vec<f64>>,
    #[serde(default)]
    pub weighted_n_node_samples: Option<Vec<f64>>,
}

impl ExportedTree {
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] == TREE_LEAF
    }

    /// Structural checks. Children must have larger ids than their parent,
    /// which also rules out cycles.
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".into());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err("tree arrays have different lengths".into());
        }
        if self.impurity.as_ref().is_some_and(|v| v.len() != n)
            || self
                .weighted_n_node_samples
                .as_ref()
                .is_some_and(|v| v.len() != n)
        {
            return Err("tree impurity statistics have wrong length".into());
        }

        for node in 0..n {
            let weights = &self.value[node];
            if weights.len() != n_classes {
                return Err(format!(
                    "node {node} has {} class weights, expected {n_classes}",
                    weights.len()
                ));
            }
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(format!("node {node} has invalid class weights"));
            }

            let left = self.children_left[node];
            let right = self.children_right[node];
            if left == TREE_LEAF {
                if right != TREE_LEAF {
                    return Err(format!("leaf {node} has a right child"));
                }
                if weights.iter().sum::<f64>() <= 0.0 {
                    return Err(format!("leaf {node} has zero total weight"));
                }
                continue;
            }

            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {node} has out-of-range child {child}"));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= n_features as i64 {
                return Err(format!(
                    "node {node} splits on feature {feature}, model has {n_features}"
                ));
            }
            if self.threshold[node].is_nan() {
                return Err(format!("node {node} has NaN threshold"));
            }
        }
        Ok(())
    }

    /// Class weights of the leaf reached by `x`.
    fn leaf_weights(&self, x: &[f64]) -> &[f64] {
        let mut node = 0usize;
        while !self.is_leaf(node) {
            let feature = self.feature[node] as usize;
            node = if x[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        &self.value[node]
    }

    /// Probability of class `class_index` for `x`.
    fn predict_class_proba(&self, x: &[f64], class_index: usize) -> f64 {
        let weights = self.leaf_weights(x);
        let total: f64 = weights.iter().sum();
        weights[class_index] / total
    }

    /// Normalised mean decrease in impurity, or `None` if the tree was
    /// exported without impurity statistics.
    fn impurity_importances(&self, n_features: usize) -> Option<Vec<f64>> {
        let impurity = self.impurity.as_ref()?;
        let weights = self.weighted_n_node_samples.as_ref()?;

        let mut importances = vec![0.0; n_features];
        for node in 0..self.node_count() {
            if self.is_leaf(node) {
                continue;
            }
            let left = self.children_left[node] as usize;
            let right = self.children_right[node] as usize;
            importances[self.feature[node] as usize] += weights[node] * impurity[node]
                - weights[left] * impurity[left]
                - weights[right] * impurity[right];
        }

        normalize(&mut importances);
        Some(importances)
    }
}

/// Scale to sum 1 when the sum is positive.
fn normalize(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        for v in values.iter_mut() {
            *v /= total;
        }
    }
}

/// Exported `RandomForestClassifier`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedForest {
    pub n_features_in: usize,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
    #[serde(default)]
    pub decision_threshold: Option<f64>,
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
    pub estimators: Vec<ExportedTree>,
}

impl ExportedForest {
    /// Validate the structure and resolve feature importances.
    ///
    /// When the export carries no `feature_importances`, they are computed
    /// from the trees' impurity statistics the way scikit-learn does.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn finalize(mut self) -> Result<Self, String> {
        if self.n_features_in == 0 {
            return Err("n_features_in must be > 0".into());
        }
        if self.classes.len() != 2 || !self.classes.contains(&POSITIVE_CLASS) {
            return Err(format!(
                "expected binary classes containing {POSITIVE_CLASS}, got {:?}",
                self.classes
            ));
        }
        if let Some(t) = self.decision_threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(format!("decision_threshold {t} outside [0, 1]"));
            }
        }
        if self.estimators.is_empty() {
            return Err("forest has no estimators".into());
        }
        for (i, tree) in self.estimators.iter().enumerate() {
            tree.validate(self.n_features_in, self.classes.len())
                .map_err(|e| format!("estimator {i}: {e}"))?;
        }

        let importances = match self.feature_importances.take() {
            Some(v) => v,
            None => self.impurity_importances().ok_or_else(|| {
                "forest carries neither feature_importances nor impurity statistics".to_string()
            })?,
        };
        if importances.len() != self.n_features_in {
            return Err(format!(
                "feature_importances has {} entries, expected {}",
                importances.len(),
                self.n_features_in
            ));
        }
        if importances.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err("feature_importances must be finite and >= 0".into());
        }
        self.feature_importances = Some(importances);

        Ok(self)
    }

    /// Mean of per-tree importances over trees that actually split,
    /// renormalised to sum 1.
    fn impurity_importances(&self) -> Option<Vec<f64>> {
        let mut total = vec![0.0; self.n_features_in];
        let mut splitting_trees = 0usize;
        for tree in &self.estimators {
            let per_tree = tree.impurity_importances(self.n_features_in)?;
            if tree.node_count() > 1 {
                for (acc, v) in total.iter_mut().zip(per_tree) {
                    *acc += v;
                }
                splitting_trees += 1;
            }
        }
        if splitting_trees > 0 {
            for v in total.iter_mut() {
                *v /= splitting_trees as f64;
            }
        }
        normalize(&mut total);
        Some(total)
    }

    fn positive_index(&self) -> usize {
        self.classes
            .iter()
            .position(|&c| c == POSITIVE_CLASS)
            .unwrap_or(1)
    }
}

impl Classifier for ExportedForest {
    fn n_features(&self) -> usize {
        self.n_features_in
    }

    fn decision_threshold(&self) -> f64 {
        self.decision_threshold.unwrap_or(DEFAULT_DECISION_THRESHOLD)
    }

    fn predict_proba(&self, x: &[f64]) -> f64 {
        let positive = self.positive_index();
        let sum: f64 = self
            .estimators
            .iter()
            .map(|tree| tree.predict_class_proba(x, positive))
            .sum();
        sum / self.estimators.len() as f64
    }

    fn feature_importances(&self) -> Vec<f64> {
        self.feature_importances
            .clone()
            .unwrap_or_else(|| vec![0.0; self.n_features_in])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Label;

    /// Stump splitting feature `feature` at `threshold`; left leaf is mostly
    /// negative, right leaf mostly positive.
    fn stump(feature: i64, threshold: f64) -> ExportedTree {
        ExportedTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![feature, -2, -2],
            threshold: vec![threshold, -2.0, -2.0],
            value: vec![vec![50.0, 50.0], vec![40.0, 10.0], vec![10.0, 40.0]],
            impurity: Some(vec![0.5, 0.32, 0.32]),
            weighted_n_node_samples: Some(vec![100.0, 50.0, 50.0]),
        }
    }

    fn forest() -> ExportedForest {
        ExportedForest {
            n_features_in: 2,
            classes: vec![0, 1],
            decision_threshold: None,
            feature_importances: None,
            estimators: vec![stump(0, 0.0), stump(1, 0.0)],
        }
        .finalize()
        .expect("valid forest")
    }

    #[test]
    fn test_predict_proba_averages_trees() {
        let f = forest();
        assert!((f.predict_proba(&[-1.0, -1.0]) - 0.2).abs() < 1e-12);
        assert!((f.predict_proba(&[1.0, 1.0]) - 0.8).abs() < 1e-12);
        assert!((f.predict_proba(&[1.0, -1.0]) - 0.5).abs() < 1e-12);
        // Threshold is inclusive on the left branch.
        assert!((f.predict_proba(&[0.0, 0.0]) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_label_consistent_with_proba() {
        let f = forest();
        assert_eq!(f.predict_label(&[1.0, -1.0]), Label::Positive);
        assert_eq!(f.predict_label(&[-1.0, -1.0]), Label::Negative);
    }

    #[test]
    fn test_impurity_importances_computed() {
        let f = forest();
        let imp = f.feature_importances();
        assert_eq!(imp.len(), 2);
        assert!((imp[0] - 0.5).abs() < 1e-12);
        assert!((imp[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_explicit_importances_win() {
        let mut raw = forest();
        raw.feature_importances = Some(vec![0.9, 0.1]);
        let f = raw.finalize().expect("valid");
        assert_eq!(f.feature_importances(), vec![0.9, 0.1]);
    }

    #[test]
    fn test_positive_class_position_respected() {
        let mut raw = forest();
        raw.classes = vec![1, 0];
        let f = raw.finalize().expect("valid");
        // Column 0 is now the positive class.
        assert!((f.predict_proba(&[-1.0, -1.0]) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_backward_child() {
        let mut tree = stump(0, 0.0);
        tree.children_left[0] = 0;
        let err = ExportedForest {
            n_features_in: 2,
            classes: vec![0, 1],
            decision_threshold: None,
            feature_importances: Some(vec![0.5, 0.5]),
            estimators: vec![tree],
        }
        .finalize()
        .expect_err("cycle must fail");
        assert!(err.contains("out-of-range child"));
    }

    #[test]
    fn test_rejects_feature_out_of_range() {
        let err = ExportedForest {
            n_features_in: 1,
            classes: vec![0, 1],
            decision_threshold: None,
            feature_importances: Some(vec![1.0]),
            estimators: vec![stump(3, 0.0)],
        }
        .finalize()
        .expect_err("feature 3 must fail");
        assert!(err.contains("feature 3"));
    }

    #[test]
    fn test_rejects_missing_importance_source() {
        let mut tree = stump(0, 0.0);
        tree.impurity = None;
        let err = ExportedForest {
            n_features_in: 2,
            classes: vec![0, 1],
            decision_threshold: None,
            feature_importances: None,
            estimators: vec![tree],
        }
        .finalize()
        .expect_err("no importances must fail");
        assert!(err.contains("neither"));
    }
}
