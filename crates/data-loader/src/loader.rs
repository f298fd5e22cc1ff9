//! Loading a full dataset from disk.

use crate::error::Result;
use crate::parser;
use crate::types::Dataset;
use std::path::Path;
use tracing::{info, instrument};

/// Default ratings file name inside a MovieLens 100k directory
pub const DEFAULT_RATINGS_FILE: &str = "u.data";

/// Default catalog file name inside a MovieLens 100k directory
pub const DEFAULT_CATALOG_FILE: &str = "Movie_Id_Titles";

impl Dataset {
    /// Load ratings and catalog from explicit paths
    ///
    /// The two files are parsed in parallel. Either failing fails the load;
    /// the ratings error wins when both fail.
    #[instrument]
    pub fn load_from_files(ratings_path: &Path, catalog_path: &Path) -> Result<Self> {
        let (ratings, catalog) = rayon::join(
            || parser::parse_ratings(ratings_path),
            || parser::parse_catalog(catalog_path),
        );
        let ratings = ratings?;
        let catalog = catalog?;

        info!(
            ratings = ratings.len(),
            catalog_entries = catalog.len(),
            "Dataset loaded"
        );

        Ok(Dataset::new(ratings, catalog))
    }

    /// Load `u.data` and `Movie_Id_Titles` from a data directory
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        Self::load_from_files(
            &data_dir.join(DEFAULT_RATINGS_FILE),
            &data_dir.join(DEFAULT_CATALOG_FILE),
        )
    }
}
