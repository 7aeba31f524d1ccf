//! JSON artifact backend for [`TableSource`].
//!
//! The external structured-table extractor emits one JSON artifact per source
//! document: a list of page records, each holding the tabular regions found
//! on that page as nested row-of-cells grids with `null` for cells it could
//! not populate. This backend loads the artifact once and serves page lookups
//! from memory.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use tablemend_core::MendError;

use crate::source::{RawGrid, TableSource};

#[derive(Debug, Deserialize)]
struct PageRecord {
    page: u32,
    #[serde(default)]
    tables: Vec<RawGrid>,
}

/// A [`TableSource`] backed by a page-tables JSON artifact.
#[derive(Debug)]
pub struct JsonTableSource {
    pages: BTreeMap<u32, Vec<RawGrid>>,
    page_count: usize,
}

impl JsonTableSource {
    /// Load an artifact from disk.
    ///
    /// Duplicate page records are merged in file order. The source's page
    /// count is the highest page number seen.
    ///
    /// # Errors
    ///
    /// [`MendError::Io`] when the file cannot be read, [`MendError::Parse`]
    /// when it is not a valid page-tables artifact.
    pub fn load(path: &Path) -> Result<Self, MendError> {
        let text = fs::read_to_string(path)
            .map_err(|e| MendError::Io(format!("{}: {e}", path.display())))?;
        let records: Vec<PageRecord> = serde_json::from_str(&text)
            .map_err(|e| MendError::Parse(format!("{}: {e}", path.display())))?;

        let mut pages: BTreeMap<u32, Vec<RawGrid>> = BTreeMap::new();
        for record in records {
            pages.entry(record.page).or_default().extend(record.tables);
        }
        let page_count = pages.keys().max().copied().unwrap_or(0) as usize;

        debug!(
            pages = pages.len(),
            page_count,
            "loaded page tables from {}",
            path.display()
        );
        Ok(Self { pages, page_count })
    }
}

impl TableSource for JsonTableSource {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_tables(&self, page: u32) -> Result<Vec<RawGrid>, MendError> {
        if page == 0 || page as usize > self.page_count {
            return Err(MendError::InvalidPage {
                page,
                count: self.page_count,
            });
        }
        Ok(self.pages.get(&page).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_artifact(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const ARTIFACT: &str = r#"[
        {"page": 1, "tables": [[["A", "B"], ["1", null]]]},
        {"page": 3, "tables": []},
        {"page": 2, "tables": [[["H"], ["x"]], [["Other"], ["y"]]]}
    ]"#;

    #[test]
    fn loads_pages_and_counts() {
        let file = write_artifact(ARTIFACT);
        let source = JsonTableSource::load(file.path()).unwrap();
        assert_eq!(source.page_count(), 3);
    }

    #[test]
    fn page_tables_returns_grids_with_null_cells() {
        let file = write_artifact(ARTIFACT);
        let source = JsonTableSource::load(file.path()).unwrap();

        let grids = source.page_tables(1).unwrap();
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0][0], vec![Some("A".to_string()), Some("B".to_string())]);
        assert_eq!(grids[0][1], vec![Some("1".to_string()), None]);
    }

    #[test]
    fn page_without_tables_yields_empty_vec() {
        let file = write_artifact(ARTIFACT);
        let source = JsonTableSource::load(file.path()).unwrap();
        assert!(source.page_tables(3).unwrap().is_empty());
    }

    #[test]
    fn multiple_grids_on_one_page_keep_order() {
        let file = write_artifact(ARTIFACT);
        let source = JsonTableSource::load(file.path()).unwrap();
        let grids = source.page_tables(2).unwrap();
        assert_eq!(grids.len(), 2);
        assert_eq!(grids[0][0], vec![Some("H".to_string())]);
    }

    #[test]
    fn duplicate_page_records_are_merged() {
        let file = write_artifact(
            r#"[
                {"page": 1, "tables": [[["A"]]]},
                {"page": 1, "tables": [[["B"]]]}
            ]"#,
        );
        let source = JsonTableSource::load(file.path()).unwrap();
        assert_eq!(source.page_tables(1).unwrap().len(), 2);
    }

    #[test]
    fn out_of_range_page_is_an_error() {
        let file = write_artifact(ARTIFACT);
        let source = JsonTableSource::load(file.path()).unwrap();
        assert!(matches!(
            source.page_tables(0),
            Err(MendError::InvalidPage { page: 0, count: 3 })
        ));
        assert!(matches!(
            source.page_tables(4),
            Err(MendError::InvalidPage { page: 4, count: 3 })
        ));
    }

    #[test]
    fn malformed_artifact_is_a_parse_error() {
        let file = write_artifact("{not json");
        assert!(matches!(
            JsonTableSource::load(file.path()),
            Err(MendError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = JsonTableSource::load(Path::new("/nonexistent/tables.json")).unwrap_err();
        assert!(matches!(err, MendError::Io(_)));
    }
}
