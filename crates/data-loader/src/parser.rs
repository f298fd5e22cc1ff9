//! Parsers for the MovieLens 100k files.
//!
//! - u.data: `user_id<TAB>item_id<TAB>rating<TAB>timestamp`, no header
//! - Movie_Id_Titles: `item_id,title` with a header row; titles may be quoted
//!   and contain commas
//!
//! Both parsers have a path-based entry point and a reader-based one so tests
//! can feed in-memory tables.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// File label used in errors from `parse_ratings_from_reader`
pub const RATINGS_FILE: &str = "u.data";

/// File label used in errors from `parse_catalog_from_reader`
pub const CATALOG_FILE: &str = "Movie_Id_Titles";

const RATING_FIELDS: usize = 4;
const CATALOG_FIELDS: usize = 2;

/// Read a whole file as text, falling back to ISO-8859-1 (Latin-1)
///
/// Some MovieLens releases ship Latin-1 titles. Each Latin-1 byte maps directly
/// to the Unicode code point of the same value.
fn read_text(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    })
}

/// Line number of a csv record, 0 if csv doesn't know it
fn record_line(record: &csv::StringRecord) -> usize {
    record.position().map(|pos| pos.line() as usize).unwrap_or(0)
}

/// Parse the ratings file at `path`
pub fn parse_ratings(path: &Path) -> Result<Vec<RatingRecord>> {
    let text = read_text(path)?;
    parse_ratings_from_reader(text.as_bytes())
}

/// Parse tab-separated rating rows
///
/// Every row must have exactly four fields and a finite rating. Blank lines
/// are skipped.
pub fn parse_ratings_from_reader<R: Read>(reader: R) -> Result<Vec<RatingRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut ratings = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| DataLoadError::from_csv(RATINGS_FILE, e))?;

        if record.len() != RATING_FIELDS {
            return Err(DataLoadError::FieldCountMismatch {
                file: RATINGS_FILE.to_string(),
                expected: RATING_FIELDS,
                found: record.len(),
                line: record_line(&record),
            });
        }

        let rating: RatingRecord = record
            .deserialize(None)
            .map_err(|e| DataLoadError::from_csv(RATINGS_FILE, e))?;

        if !rating.rating.is_finite() {
            return Err(DataLoadError::ParseError {
                file: RATINGS_FILE.to_string(),
                line: record_line(&record),
                reason: format!("Invalid rating: {} is not a finite number", rating.rating),
            });
        }
        ratings.push(rating);
    }

    Ok(ratings)
}

/// Parse the catalog file at `path`
pub fn parse_catalog(path: &Path) -> Result<ItemCatalog> {
    let text = read_text(path)?;
    parse_catalog_from_reader(text.as_bytes())
}

/// Parse comma-separated `item_id,title` rows after a header row
///
/// Columns are read by position, so the header's exact names don't matter.
pub fn parse_catalog_from_reader<R: Read>(reader: R) -> Result<ItemCatalog> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut catalog = ItemCatalog::new();
    for result in rdr.records() {
        let record = result.map_err(|e| DataLoadError::from_csv(CATALOG_FILE, e))?;

        if record.len() != CATALOG_FIELDS {
            return Err(DataLoadError::FieldCountMismatch {
                file: CATALOG_FILE.to_string(),
                expected: CATALOG_FIELDS,
                found: record.len(),
                line: record_line(&record),
            });
        }

        let entry: CatalogEntry = record
            .deserialize(None)
            .map_err(|e| DataLoadError::from_csv(CATALOG_FILE, e))?;
        catalog.insert(entry)?;
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ratings() {
        let data = "196\t242\t3\t881250949\n186\t302\t3\t891717742\n\n22\t377\t1\t878887116\n";
        let ratings = parse_ratings_from_reader(data.as_bytes()).unwrap();

        assert_eq!(ratings.len(), 3);
        assert_eq!(ratings[0].user_id, 196);
        assert_eq!(ratings[0].item_id, 242);
        assert_eq!(ratings[0].rating, 3.0);
        assert_eq!(ratings[0].timestamp, 881250949);
        assert_eq!(ratings[2].rating, 1.0);
    }

    #[test]
    fn test_parse_ratings_wrong_field_count() {
        let data = "196\t242\t3\t881250949\n186\t302\t3\n";
        let err = parse_ratings_from_reader(data.as_bytes()).unwrap_err();

        match err {
            DataLoadError::FieldCountMismatch {
                expected, found, line, ..
            } => {
                assert_eq!(expected, 4);
                assert_eq!(found, 3);
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_ratings_bad_number() {
        let data = "196\tabc\t3\t881250949\n";
        let err = parse_ratings_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_parse_ratings_rejects_non_finite() {
        for bad in ["NaN", "inf", "-inf"] {
            let data = format!("1\t1\t5\t0\n2\t1\t{bad}\t0\n");
            let err = parse_ratings_from_reader(data.as_bytes()).unwrap_err();
            assert!(
                matches!(err, DataLoadError::ParseError { line: 2, .. }),
                "{bad}: unexpected error {err}"
            );
        }
    }

    #[test]
    fn test_parse_catalog_with_quoted_titles() {
        let data = "item_id,title\n1,Toy Story (1995)\n2,\"Shawshank Redemption, The (1994)\"\n";
        let catalog = parse_catalog_from_reader(data.as_bytes()).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.title(1), Some("Toy Story (1995)"));
        assert_eq!(catalog.title(2), Some("Shawshank Redemption, The (1994)"));
        assert_eq!(catalog.title(3), None);
    }

    #[test]
    fn test_parse_catalog_duplicate_id() {
        let data = "item_id,title\n1,Toy Story (1995)\n1,GoldenEye (1995)\n";
        let err = parse_catalog_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::DuplicateCatalogEntry { item_id: 1, .. }
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_ratings(Path::new("definitely/not/here/u.data")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
