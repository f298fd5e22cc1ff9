//! # Data Loader Crate
//!
//! Reads the MovieLens 100k ratings table and item catalog into typed records.
//!
//! ## Main Components
//!
//! - **types**: Record types (RatingRecord, CatalogEntry, ItemCatalog, Dataset)
//! - **parser**: Parse the tab-separated ratings and comma-separated catalog
//! - **loader**: Load both files from disk in parallel
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Dataset;
//! use std::path::Path;
//!
//! let dataset = Dataset::load_from_dir(Path::new("data"))?;
//! let (ratings, items) = dataset.counts();
//! println!("{ratings} ratings over {items} items");
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod loader;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use loader::{DEFAULT_CATALOG_FILE, DEFAULT_RATINGS_FILE};
pub use types::{
    // Type aliases
    UserId,
    ItemId,
    // Core types
    RatingRecord,
    CatalogEntry,
    ItemCatalog,
    Dataset,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::default();
        let (ratings, items) = dataset.counts();

        assert_eq!(ratings, 0);
        assert_eq!(items, 0);
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = ItemCatalog::from_entries(vec![
            CatalogEntry {
                item_id: 50,
                title: "Star Wars (1977)".to_string(),
            },
            CatalogEntry {
                item_id: 181,
                title: "Return of the Jedi (1983)".to_string(),
            },
        ])
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.title(50), Some("Star Wars (1977)"));
        assert!(catalog.title(999).is_none());
    }

    #[test]
    fn test_catalog_same_entry_twice_is_accepted() {
        let mut catalog = ItemCatalog::new();
        let entry = CatalogEntry {
            item_id: 1,
            title: "Toy Story (1995)".to_string(),
        };

        catalog.insert(entry.clone()).unwrap();
        catalog.insert(entry).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_catalog_shared_titles_are_allowed() {
        // Two ids, one title: merged later by the similarity crate
        let catalog = ItemCatalog::from_entries(vec![
            CatalogEntry {
                item_id: 246,
                title: "Chasing Amy (1997)".to_string(),
            },
            CatalogEntry {
                item_id: 268,
                title: "Chasing Amy (1997)".to_string(),
            },
        ])
        .unwrap();

        assert_eq!(catalog.len(), 2);
    }
}
