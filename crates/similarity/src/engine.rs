//! Similarity Engine - items whose ratings move with a target item
//!
//! ## Algorithm
//! 1. Look up the target title's rating column
//! 2. For every other title with more than `min_ratings` ratings, compute the
//!    Pearson correlation between the two columns over users who rated both
//! 3. Drop titles whose correlation is undefined (fewer than two shared users,
//!    or a constant side)
//! 4. Rank by correlation, highest first

use crate::error::{Result, SimilarityError};
use crate::matrix::RatingMatrix;
use crate::pearson::column_correlation;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, instrument};

/// One row of a similarity result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarItem {
    pub title: String,
    /// Pearson correlation with the target, in [-1, 1]
    pub correlation: f64,
    /// Total ratings this title received
    pub num_ratings: u32,
}

/// Answers "what is rated like this?" queries over a shared rating matrix
#[derive(Debug, Clone)]
pub struct SimilarityEngine {
    /// Shared reference to the matrix (read-only, so no Mutex needed)
    matrix: Arc<RatingMatrix>,

    /// Whether the target may appear in its own results
    include_target: bool,
}

impl SimilarityEngine {
    /// Create an engine over a built matrix
    ///
    /// The target title is excluded from its own results by default.
    pub fn new(matrix: Arc<RatingMatrix>) -> Self {
        Self {
            matrix,
            include_target: false,
        }
    }

    /// Let the target title appear in its own results (default: false)
    ///
    /// Its self-correlation is 1.0, so when included it ranks first whenever
    /// it clears `min_ratings`.
    pub fn with_include_target(mut self, include: bool) -> Self {
        self.include_target = include;
        self
    }

    pub fn matrix(&self) -> &RatingMatrix {
        &self.matrix
    }

    /// Pearson correlation between two titles
    ///
    /// `Ok(None)` when the correlation is undefined.
    pub fn correlation(&self, a: &str, b: &str) -> Result<Option<f64>> {
        let a = self.lookup(a)?;
        let b = self.lookup(b)?;
        Ok(column_correlation(
            self.matrix.column_at(a),
            self.matrix.column_at(b),
        ))
    }

    /// Titles correlated with `target`, best match first
    ///
    /// Only titles with strictly more than `min_ratings` ratings and a defined
    /// correlation are returned. Equal correlations are ordered by rating
    /// count (descending), then title.
    ///
    /// # Errors
    /// `SimilarityError::UnknownItem` if `target` has no column in the matrix
    #[instrument(skip(self))]
    pub fn find_similar(&self, target: &str, min_ratings: u32) -> Result<Vec<SimilarItem>> {
        let target_idx = self.lookup(target)?;
        let target_column = self.matrix.column_at(target_idx);
        debug!(raters = target_column.len(), "Scanning correlations");

        let mut similar: Vec<SimilarItem> = (0..self.matrix.item_count())
            .into_par_iter()
            .filter(|&idx| self.include_target || idx != target_idx)
            .filter_map(|idx| {
                let stats = self.matrix.stats_at(idx);
                if stats.num_ratings <= min_ratings {
                    return None;
                }

                let correlation = column_correlation(target_column, self.matrix.column_at(idx))?;
                Some(SimilarItem {
                    title: self.matrix.title_at(idx).to_string(),
                    correlation,
                    num_ratings: stats.num_ratings,
                })
            })
            .collect();

        similar.sort_by(rank_order);

        debug!(results = similar.len(), "Similarity query complete");
        Ok(similar)
    }

    fn lookup(&self, title: &str) -> Result<usize> {
        self.matrix
            .index_of(title)
            .ok_or_else(|| SimilarityError::UnknownItem {
                title: title.to_string(),
            })
    }
}

/// Correlation descending, then rating count descending, then title
fn rank_order(a: &SimilarItem, b: &SimilarItem) -> Ordering {
    b.correlation
        .total_cmp(&a.correlation)
        .then_with(|| b.num_ratings.cmp(&a.num_ratings))
        .then_with(|| a.title.cmp(&b.title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{CatalogEntry, ItemCatalog, RatingRecord};

    /// Items A, B, C, D over users 1-5:
    /// - B matches A exactly
    /// - C shares one user with A
    /// - D is A reversed
    fn create_test_engine() -> SimilarityEngine {
        let catalog = ItemCatalog::from_entries(
            ["A", "B", "C", "D"]
                .iter()
                .enumerate()
                .map(|(i, title)| CatalogEntry {
                    item_id: i as u32 + 1,
                    title: title.to_string(),
                }),
        )
        .unwrap();

        let mut records = Vec::new();
        for (user, rating) in (1..=5).zip([5.0, 4.0, 3.0, 2.0, 1.0]) {
            records.push(RatingRecord::new(user, 1, rating));
            records.push(RatingRecord::new(user, 2, rating));
            records.push(RatingRecord::new(user, 4, 6.0 - rating));
        }
        records.push(RatingRecord::new(1, 3, 4.0));
        records.push(RatingRecord::new(9, 3, 2.0));

        let matrix = RatingMatrix::build(&records, &catalog).unwrap();
        SimilarityEngine::new(Arc::new(matrix))
    }

    fn titles(items: &[SimilarItem]) -> Vec<&str> {
        items.iter().map(|item| item.title.as_str()).collect()
    }

    #[test]
    fn test_identical_ratings_correlate_perfectly() {
        let engine = create_test_engine();
        let r = engine.correlation("A", "B").unwrap().unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_find_similar_ranks_and_drops_undefined() {
        let engine = create_test_engine();
        let similar = engine.find_similar("A", 0).unwrap();

        // C has a single co-rater with A: undefined, dropped
        assert_eq!(titles(&similar), vec!["B", "D"]);
        assert!((similar[0].correlation - 1.0).abs() < 1e-12);
        assert!((similar[1].correlation + 1.0).abs() < 1e-12);
        assert_eq!(similar[0].num_ratings, 5);
    }

    #[test]
    fn test_target_excluded_by_default() {
        let engine = create_test_engine();
        let similar = engine.find_similar("A", 0).unwrap();
        assert!(!titles(&similar).contains(&"A"));
    }

    #[test]
    fn test_include_target() {
        let engine = create_test_engine().with_include_target(true);
        let similar = engine.find_similar("A", 0).unwrap();

        // A and B tie at 1.0 with 5 ratings each; title breaks the tie
        assert_eq!(titles(&similar), vec!["A", "B", "D"]);
    }

    #[test]
    fn test_min_ratings_is_strict() {
        let engine = create_test_engine();

        // B and D have exactly 5 ratings
        assert_eq!(engine.find_similar("A", 4).unwrap().len(), 2);
        assert!(engine.find_similar("A", 5).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_target() {
        let engine = create_test_engine();
        let err = engine.find_similar("Z", 0).unwrap_err();
        assert_eq!(
            err,
            SimilarityError::UnknownItem {
                title: "Z".to_string()
            }
        );
        assert!(matches!(
            engine.correlation("A", "Z"),
            Err(SimilarityError::UnknownItem { .. })
        ));
    }

    #[test]
    fn test_nan_rating_never_yields_nan_correlation() {
        let catalog = ItemCatalog::from_entries(vec![
            CatalogEntry {
                item_id: 1,
                title: "A".to_string(),
            },
            CatalogEntry {
                item_id: 2,
                title: "B".to_string(),
            },
        ])
        .unwrap();
        let records = vec![
            RatingRecord::new(1, 1, 5.0),
            RatingRecord::new(2, 1, 4.0),
            RatingRecord::new(3, 1, 3.0),
            RatingRecord::new(1, 2, 5.0),
            RatingRecord::new(2, 2, f64::NAN),
            RatingRecord::new(3, 2, 3.0),
        ];
        let matrix = RatingMatrix::build(&records, &catalog).unwrap();
        let engine = SimilarityEngine::new(Arc::new(matrix));

        // The NaN cell is missing, leaving users 1 and 3 in agreement
        let similar = engine.find_similar("A", 0).unwrap();
        assert_eq!(titles(&similar), vec!["B"]);
        assert!(similar[0].correlation.is_finite());
        assert!((similar[0].correlation - 1.0).abs() < 1e-12);
        assert_eq!(similar[0].num_ratings, 2);
    }

    #[test]
    fn test_rank_order_tie_break() {
        let item = |title: &str, correlation: f64, num_ratings: u32| SimilarItem {
            title: title.to_string(),
            correlation,
            num_ratings,
        };
        let mut items = vec![
            item("b", 0.5, 10),
            item("a", 0.5, 10),
            item("c", 0.5, 20),
            item("d", 0.9, 1),
        ];
        items.sort_by(rank_order);
        assert_eq!(titles(&items), vec!["d", "c", "a", "b"]);
    }
}
