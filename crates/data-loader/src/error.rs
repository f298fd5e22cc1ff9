//! Error types for the data-loader crate.

use thiserror::Error;

use crate::types::ItemId;

/// Errors that can occur while reading the ratings and catalog files
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Row in a data file couldn't be parsed
    ///
    /// `line` is 1-based and counts the header row when the file has one.
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// Expected number of fields in a row doesn't match actual
    #[error("Expected {expected} fields but found {found} in line {line} of {file}")]
    FieldCountMismatch {
        file: String,
        expected: usize,
        found: usize,
        line: usize,
    },

    /// The catalog maps the same item id to more than one title
    #[error("Duplicate catalog entry for item {item_id}: {first:?} and {second:?}")]
    DuplicateCatalogEntry {
        item_id: ItemId,
        first: String,
        second: String,
    },
}

impl DataLoadError {
    /// Build a `ParseError` from a csv error, keeping the position when csv reports one
    pub(crate) fn from_csv(file: &str, err: csv::Error) -> Self {
        let line = err
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(0);

        let reason = err.to_string();

        match err.into_kind() {
            csv::ErrorKind::Io(io) => DataLoadError::IoError(io),
            _ => DataLoadError::ParseError {
                file: file.to_string(),
                line,
                reason,
            },
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
