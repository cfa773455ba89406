//! Error types for the catalog crate.
//!
//! Every variant is recoverable: callers report it and carry on with the
//! catalog in whatever state it was in before the failing call.

use thiserror::Error;

/// Errors that can occur while building, loading, or rating the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A rating outside the accepted 1-5 star range
    #[error("Invalid rating {0}: enter a number between 1 and 5")]
    InvalidRating(i64),

    /// The bulk-load source could not be opened
    #[error("Catalog source not found or unreadable: {path}")]
    SourceUnavailable { path: String },

    /// I/O error occurred while reading the source
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in the catalog file couldn't be parsed
    #[error("Parse error at line {line}: {reason}")]
    ParseError { line: usize, reason: String },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Expected number of fields in a line doesn't match actual
    #[error("Expected {expected} fields but found {found} in line {line}")]
    FieldCountMismatch {
        expected: usize,
        found: usize,
        line: usize,
    },

    /// The title, company, and genre indices disagree with each other
    #[error("Catalog index is inconsistent: {0}")]
    Inconsistent(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
