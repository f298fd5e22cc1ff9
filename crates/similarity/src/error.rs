//! Error types for matrix construction and similarity queries.

use data_loader::ItemId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimilarityError {
    /// A rating references an item id missing from the catalog
    #[error("Rating references item {item_id}, which is not in the catalog")]
    Join { item_id: ItemId },

    /// No ratings were supplied, so there is nothing to build a matrix from
    #[error("No ratings to build a rating matrix from")]
    EmptyDataset,

    /// A query named a title that has no column in the rating matrix
    #[error("Movie '{title}' not found in the dataset")]
    UnknownItem { title: String },
}

pub type Result<T> = std::result::Result<T, SimilarityError>;
