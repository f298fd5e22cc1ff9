//! # Similarity Crate
//!
//! Pearson-correlation item similarity over a user x item rating matrix.
//!
//! ## Components
//!
//! ### Rating Matrix
//! Built once from the ratings joined with the catalog:
//! - One column per title, holding `(user, rating)` pairs
//! - Per-title average rating and rating count
//! - Immutable after construction, shared through `Arc`
//!
//! ### Similarity Engine
//! "People who rated this the way you did also rated these the same way":
//! - Correlates the target column with every other column
//! - Drops undefined correlations and titles without enough ratings
//! - Ranks by correlation
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Dataset;
//! use similarity::{RatingMatrix, SimilarityEngine};
//! use std::sync::Arc;
//!
//! let dataset = Dataset::load_from_dir(Path::new("data"))?;
//! let matrix = Arc::new(RatingMatrix::from_dataset(&dataset)?);
//! let engine = SimilarityEngine::new(matrix);
//!
//! for item in engine.find_similar("Star Wars (1977)", 100)?.iter().take(10) {
//!     println!("{} {:.3} ({} ratings)", item.title, item.correlation, item.num_ratings);
//! }
//! ```

pub mod error;
pub mod pearson;
pub mod matrix;
pub mod engine;

// Re-export commonly used types
pub use error::{Result, SimilarityError};
pub use matrix::{ItemStats, RatingMatrix};
pub use engine::{SimilarItem, SimilarityEngine};
