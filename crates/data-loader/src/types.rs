//! Core record types for the ratings and catalog tables.
//!
//! Both tables are loaded once and handed to the similarity crate, which joins
//! them on `item_id` and keys everything by title from then on.

use crate::error::{DataLoadError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user (1-943 in MovieLens 100k)
pub type UserId = u32;

/// Unique identifier for a rated item (1-1682 in MovieLens 100k)
pub type ItemId = u32;

// =============================================================================
// Records
// =============================================================================

/// A single observed rating event
///
/// Field order matches the ratings file: `user_id item_id rating timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub user_id: UserId,
    pub item_id: ItemId,
    /// Rating value, 1-5 in MovieLens but not range checked
    pub rating: f64,
    /// Unix timestamp when the rating was made
    pub timestamp: i64,
}

impl RatingRecord {
    pub fn new(user_id: UserId, item_id: ItemId, rating: f64) -> Self {
        Self {
            user_id,
            item_id,
            rating,
            timestamp: 0,
        }
    }
}

/// One row of the item catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub item_id: ItemId,
    pub title: String,
}

// =============================================================================
// ItemCatalog
// =============================================================================

/// Lookup from item id to human-readable title
///
/// Each item id has exactly one title. Distinct ids may share a title; the
/// similarity crate merges their ratings under that title.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    titles: HashMap<ItemId, String>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, rejecting ids that appear twice
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let mut catalog = Self::new();
        for entry in entries {
            catalog.insert(entry)?;
        }
        Ok(catalog)
    }

    /// Add an entry to the catalog
    ///
    /// Re-inserting the same id with the same title is accepted, a different
    /// title is a `DuplicateCatalogEntry` error.
    pub fn insert(&mut self, entry: CatalogEntry) -> Result<()> {
        match self.titles.get(&entry.item_id) {
            Some(existing) if *existing != entry.title => {
                Err(DataLoadError::DuplicateCatalogEntry {
                    item_id: entry.item_id,
                    first: existing.clone(),
                    second: entry.title,
                })
            }
            Some(_) => Ok(()),
            None => {
                self.titles.insert(entry.item_id, entry.title);
                Ok(())
            }
        }
    }

    /// Get the title for an item id
    pub fn title(&self, item_id: ItemId) -> Option<&str> {
        self.titles.get(&item_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// Everything read from disk: the raw ratings and the catalog they join against
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub ratings: Vec<RatingRecord>,
    pub catalog: ItemCatalog,
}

impl Dataset {
    pub fn new(ratings: Vec<RatingRecord>, catalog: ItemCatalog) -> Self {
        Self { ratings, catalog }
    }

    /// Get counts for debugging/validation: (ratings, catalog entries)
    pub fn counts(&self) -> (usize, usize) {
        (self.ratings.len(), self.catalog.len())
    }
}
