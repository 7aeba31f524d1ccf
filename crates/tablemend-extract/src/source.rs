//! Page-level table source trait.
//!
//! Defines the [`TableSource`] trait that abstracts the external
//! structured-table extraction capability: given a 1-indexed page number, a
//! source yields zero or more tabular regions as row-of-cells grids. Surgery
//! and the fallback index builder are written against this trait, so backends
//! (JSON artifacts, in-memory fixtures) are pluggable.

use tablemend_core::MendError;

/// One tabular region as extracted from a source page.
///
/// Rows of cells; a `None` cell is a cell the extractor could not populate.
/// Normalization to empty strings is the consumer's job.
pub type RawGrid = Vec<Vec<Option<String>>>;

/// Trait abstracting page-indexed structured-table extraction.
pub trait TableSource {
    /// Number of pages in the source document.
    fn page_count(&self) -> usize;

    /// All tabular regions on a page, in layout order.
    ///
    /// Pages are 1-indexed. An empty vector means the page holds no tabular
    /// region, which is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`MendError::InvalidPage`] when `page` is 0 or beyond the
    /// source's page count.
    fn page_tables(&self, page: u32) -> Result<Vec<RawGrid>, MendError>;
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use std::collections::BTreeMap;

    /// In-memory source for unit tests.
    pub struct MemorySource {
        pub pages: BTreeMap<u32, Vec<RawGrid>>,
        pub page_count: usize,
    }

    impl MemorySource {
        pub fn new(pages: BTreeMap<u32, Vec<RawGrid>>) -> Self {
            let page_count = pages.keys().max().copied().unwrap_or(0) as usize;
            Self { pages, page_count }
        }
    }

    impl TableSource for MemorySource {
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

    /// Build a grid from string slices, turning `"~"` into a `None` cell.
    pub fn grid(rows: &[&[&str]]) -> RawGrid {
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        if *cell == "~" {
                            None
                        } else {
                            Some(cell.to_string())
                        }
                    })
                    .collect()
            })
            .collect()
    }
}
