//! Rating matrix and per-item statistics.
//!
//! The matrix is built once from the joined ratings and catalog and is
//! read-only afterwards. It is stored column-wise: one sorted
//! `(user, rating)` vector per title, which is the shape the correlation
//! sweep reads.

use crate::error::{Result, SimilarityError};
use crate::pearson::Column;
use data_loader::{Dataset, ItemCatalog, RatingRecord, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, instrument};

/// Mean rating and number of ratings for one title
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    pub average_rating: f64,
    pub num_ratings: u32,
}

/// Running totals for one title while the matrix is being built
#[derive(Default)]
struct ItemAccumulator {
    sum: f64,
    count: u32,
    /// Per-user (sum, count), so repeated ratings can be averaged into one cell
    cells: BTreeMap<UserId, (f64, u32)>,
}

/// Sparse user x title rating matrix plus item statistics
#[derive(Debug, Clone)]
pub struct RatingMatrix {
    /// Column titles in lexicographic order
    titles: Vec<String>,
    title_index: HashMap<String, usize>,
    /// `columns[i]` holds the ratings for `titles[i]`, sorted by user id
    columns: Vec<Vec<(UserId, f64)>>,
    /// `stats[i]` describes `titles[i]`
    stats: Vec<ItemStats>,
    user_count: usize,
    rating_count: usize,
}

impl RatingMatrix {
    /// Join ratings with the catalog and build the matrix
    ///
    /// Item statistics count every rating record with a finite value. If a
    /// user rated the same title more than once (possibly through two item ids
    /// sharing a title), the matrix cell holds the mean of those ratings.
    /// Non-finite ratings (NaN, infinities) are treated as missing cells.
    ///
    /// # Errors
    /// * `SimilarityError::Join` if a record's item id is not in the catalog
    /// * `SimilarityError::EmptyDataset` if no record has a finite rating
    #[instrument(skip_all, fields(records = records.len(), catalog = catalog.len()))]
    pub fn build(records: &[RatingRecord], catalog: &ItemCatalog) -> Result<Self> {
        let mut items: BTreeMap<&str, ItemAccumulator> = BTreeMap::new();
        let mut skipped = 0usize;

        for record in records {
            let title = catalog
                .title(record.item_id)
                .ok_or(SimilarityError::Join {
                    item_id: record.item_id,
                })?;

            if !record.rating.is_finite() {
                skipped += 1;
                continue;
            }

            let item = items.entry(title).or_default();
            item.sum += record.rating;
            item.count += 1;

            let cell = item.cells.entry(record.user_id).or_insert((0.0, 0));
            cell.0 += record.rating;
            cell.1 += 1;
        }

        if skipped > 0 {
            debug!(skipped, "Ignored non-finite ratings");
        }
        if items.is_empty() {
            return Err(SimilarityError::EmptyDataset);
        }

        let mut titles = Vec::with_capacity(items.len());
        let mut columns = Vec::with_capacity(items.len());
        let mut stats = Vec::with_capacity(items.len());
        let mut users = HashSet::new();

        for (title, item) in items {
            titles.push(title.to_string());
            stats.push(ItemStats {
                average_rating: item.sum / item.count as f64,
                num_ratings: item.count,
            });
            columns.push(
                item.cells
                    .into_iter()
                    .map(|(user_id, (sum, count))| {
                        users.insert(user_id);
                        (user_id, sum / count as f64)
                    })
                    .collect::<Vec<_>>(),
            );
        }

        let title_index = titles
            .iter()
            .enumerate()
            .map(|(idx, title)| (title.clone(), idx))
            .collect();

        let matrix = Self {
            titles,
            title_index,
            columns,
            stats,
            user_count: users.len(),
            rating_count: records.len() - skipped,
        };

        let (users, items, ratings) = matrix.counts();
        debug!(users, items, ratings, "Rating matrix built");
        Ok(matrix)
    }

    /// Build the matrix from a loaded dataset
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        Self::build(&dataset.ratings, &dataset.catalog)
    }

    /// All column titles, in lexicographic order
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Whether `title` has a column
    pub fn contains(&self, title: &str) -> bool {
        self.title_index.contains_key(title)
    }

    /// Ratings for `title`, sorted by user id
    pub fn column(&self, title: &str) -> Option<&Column> {
        self.index_of(title).map(|idx| self.column_at(idx))
    }

    /// The rating `user_id` gave `title`, if any
    pub fn get(&self, user_id: UserId, title: &str) -> Option<f64> {
        let column = self.column(title)?;
        column
            .binary_search_by_key(&user_id, |&(user, _)| user)
            .ok()
            .map(|pos| column[pos].1)
    }

    /// Average rating and rating count for `title`
    pub fn item_stats(&self, title: &str) -> Option<&ItemStats> {
        self.index_of(title).map(|idx| &self.stats[idx])
    }

    /// Get counts for debugging/validation: (users, items, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.user_count, self.titles.len(), self.rating_count)
    }

    /// Titles with the most ratings, most first
    ///
    /// Ties are ordered by title.
    pub fn most_rated(&self, limit: usize) -> Vec<(&str, ItemStats)> {
        let mut ranked = self.stats_by_title();
        ranked.sort_by(|a, b| b.1.num_ratings.cmp(&a.1.num_ratings).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }

    /// Titles with the highest average rating among those with more than
    /// `min_ratings` ratings
    ///
    /// Ties are ordered by rating count, then title.
    pub fn top_rated(&self, min_ratings: u32, limit: usize) -> Vec<(&str, ItemStats)> {
        let mut ranked: Vec<_> = self
            .stats_by_title()
            .into_iter()
            .filter(|(_, stats)| stats.num_ratings > min_ratings)
            .collect();
        ranked.sort_by(|a, b| {
            b.1.average_rating
                .total_cmp(&a.1.average_rating)
                .then_with(|| b.1.num_ratings.cmp(&a.1.num_ratings))
                .then_with(|| a.0.cmp(b.0))
        });
        ranked.truncate(limit);
        ranked
    }

    /// Case-insensitive substring search over titles
    ///
    /// Exact (case-insensitive) matches come first, then substring matches by
    /// descending rating count.
    pub fn search_titles(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        let mut matches: Vec<(bool, u32, &str)> = self
            .titles
            .iter()
            .zip(&self.stats)
            .filter_map(|(title, stats)| {
                let lower = title.to_lowercase();
                if lower == query {
                    Some((false, stats.num_ratings, title.as_str()))
                } else if lower.contains(&query) {
                    Some((true, stats.num_ratings, title.as_str()))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| b.1.cmp(&a.1))
                .then_with(|| a.2.cmp(b.2))
        });
        matches.into_iter().map(|(_, _, title)| title).collect()
    }

    pub(crate) fn index_of(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    pub(crate) fn item_count(&self) -> usize {
        self.titles.len()
    }

    pub(crate) fn title_at(&self, idx: usize) -> &str {
        &self.titles[idx]
    }

    pub(crate) fn column_at(&self, idx: usize) -> &Column {
        &self.columns[idx]
    }

    pub(crate) fn stats_at(&self, idx: usize) -> &ItemStats {
        &self.stats[idx]
    }

    fn stats_by_title(&self) -> Vec<(&str, ItemStats)> {
        self.titles
            .iter()
            .map(String::as_str)
            .zip(self.stats.iter().copied())
            .collect()
    }
}
