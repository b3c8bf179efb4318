//! Ranked feature importances for display.

use serde::{Deserialize, Serialize};

/// Maximum number of entries shown in the importance chart.
pub const TOP_IMPORTANCES: usize = 6;

/// One bar of the importance chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub score: f64,
}

/// Features sorted by descending importance score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportanceRanking {
    pub entries: Vec<FeatureImportance>,
}

impl ImportanceRanking {
    /// Pair names with scores, sort descending and keep the top `limit`.
    ///
    /// The sort is stable: equal scores keep their input order. Callers are
    /// expected to pass equal-length slices.
    #[must_use]
    pub fn from_scores(names: &[&str], scores: &[f64], limit: usize) -> Self {
        let mut entries: Vec<FeatureImportance> = names
            .iter()
            .zip(scores)
            .map(|(name, score)| FeatureImportance {
                feature: (*name).to_string(),
                score: *score,
            })
            .collect();

        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        entries.truncate(limit);

        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest score, used to scale the chart.
    #[must_use]
    pub fn max_score(&self) -> f64 {
        self.entries.first().map(|e| e.score).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureImportance> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_descending() {
        let ranking = ImportanceRanking::from_scores(
            &["a", "b", "c", "d"],
            &[0.1, 0.4, 0.2, 0.3],
            TOP_IMPORTANCES,
        );
        let names: Vec<&str> = ranking.iter().map(|e| e.feature.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "c", "a"]);
        assert!((ranking.max_score() - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranking = ImportanceRanking::from_scores(
            &["a", "b", "c", "d"],
            &[0.25, 0.25, 0.5, 0.25],
            TOP_IMPORTANCES,
        );
        let names: Vec<&str> = ranking.iter().map(|e| e.feature.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let names = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let scores = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8];
        let ranking = ImportanceRanking::from_scores(&names, &scores, TOP_IMPORTANCES);
        assert_eq!(ranking.len(), TOP_IMPORTANCES);
        assert_eq!(ranking.entries[0].feature, "h");
        assert_eq!(ranking.entries[5].feature, "c");
    }
}
