//! Error type for the table-integrity pipeline.
//!
//! Provides [`MendError`] for failures that cross a stage boundary. Stage
//! functions return these as values; the orchestrators only aggregate and
//! report them, so a per-table failure never aborts a document run.

use std::fmt;

/// Error raised by a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MendError {
    /// I/O error reading or writing a file artifact.
    Io(String),
    /// A file artifact (metadata, index, page tables) could not be parsed.
    Parse(String),
    /// A page number outside the source document's page range.
    InvalidPage {
        /// The requested 1-indexed page.
        page: u32,
        /// The source document's page count.
        count: usize,
    },
    /// The source page contained no tabular region.
    NoTables {
        /// The 1-indexed page that was searched.
        page: u32,
    },
    /// The first tabular region on the page has fewer than two rows.
    TableTooSmall {
        /// The 1-indexed page that was searched.
        page: u32,
    },
    /// A table identifier was not found where it was expected.
    NotFound(String),
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for MendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MendError::Io(msg) => write!(f, "I/O error: {msg}"),
            MendError::Parse(msg) => write!(f, "parse error: {msg}"),
            MendError::InvalidPage { page, count } => {
                write!(f, "invalid page number: {page} (source has {count} pages)")
            }
            MendError::NoTables { page } => write!(f, "no tables found on page {page}"),
            MendError::TableTooSmall { page } => write!(f, "table too small on page {page}"),
            MendError::NotFound(what) => write!(f, "not found: {what}"),
            MendError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for MendError {}

impl From<std::io::Error> for MendError {
    fn from(err: std::io::Error) -> Self {
        MendError::Io(err.to_string())
    }
}
