//! Table re-extraction from page-level source data.
//!
//! Pulls a table's cells straight from the source document through a
//! [`TableSource`] and normalizes them into an [`ExtractedTable`]. Single-page
//! extraction takes the first tabular region on the page; multi-page
//! extraction stitches a table that was split across consecutive pages,
//! dropping repeated header rows.

use tracing::{debug, warn};

use tablemend_core::{ExtractedTable, MendError};
use tablemend_extract::{RawGrid, TableSource};

/// Maximum number of pages a multi-page extraction will walk.
pub const MAX_PAGE_SPAN: u32 = 5;

/// `None` cells become empty strings.
fn normalize_row(row: &[Option<String>]) -> Vec<String> {
    row.iter()
        .map(|cell| cell.clone().unwrap_or_default())
        .collect()
}

/// Extract the table on a single source page.
///
/// Uses the first tabular region on the page (source pages rarely hold more
/// than one), with row 0 as the header and the remainder as data.
///
/// # Errors
///
/// [`MendError::NoTables`] when the page has no tabular region,
/// [`MendError::TableTooSmall`] when the first region has fewer than two
/// rows, or the source's own error for an invalid page.
pub fn extract_table(
    source: &dyn TableSource,
    page: u32,
    table_id: &str,
) -> Result<ExtractedTable, MendError> {
    let grids = source.page_tables(page)?;
    let grid = grids.first().ok_or(MendError::NoTables { page })?;

    if grid.len() < 2 {
        return Err(MendError::TableTooSmall { page });
    }

    let headers = normalize_row(&grid[0]);
    let rows: Vec<Vec<String>> = grid[1..].iter().map(|r| normalize_row(r)).collect();

    let mut raw = vec![headers.clone()];
    raw.extend(rows.clone());

    debug!(table_id, page, rows = rows.len(), "extracted table");
    Ok(ExtractedTable {
        table_id: table_id.to_string(),
        page,
        headers,
        rows,
        raw,
    })
}

/// Extract and merge a table split across `start_page..=end_page`.
///
/// The span is capped at [`MAX_PAGE_SPAN`] pages. The first page carrying a
/// tabular region fixes the canonical header; on later pages a first row
/// identical to that header is a repeated header and is dropped, while a
/// differing first row keeps the whole region as data. Pages without a
/// region, and pages outside the source, are skipped without failing the
/// operation. Rows are concatenated in page order.
///
/// # Errors
///
/// [`MendError::NoTables`] when no page in the span carried a region.
pub fn extract_multipage_table(
    source: &dyn TableSource,
    start_page: u32,
    end_page: u32,
    table_id: &str,
) -> Result<ExtractedTable, MendError> {
    let end_page = end_page.min(start_page.saturating_add(MAX_PAGE_SPAN - 1));

    let mut headers: Option<Vec<String>> = None;
    let mut all_rows: Vec<Vec<String>> = Vec::new();

    for page in start_page..=end_page {
        if page == 0 || page as usize > source.page_count() {
            continue;
        }
        let grids = match source.page_tables(page) {
            Ok(grids) => grids,
            Err(e) => {
                warn!(table_id, page, "skipping page during multi-page extraction: {e}");
                continue;
            }
        };
        let Some(grid) = grids.first() else {
            continue;
        };

        match &headers {
            None => {
                headers = Some(normalize_row(&grid[0]));
                all_rows.extend(data_rows(grid, true));
            }
            Some(canonical) => {
                let first = normalize_row(&grid[0]);
                let repeated = &first == canonical;
                all_rows.extend(data_rows(grid, repeated));
            }
        }
    }

    let headers = headers.ok_or(MendError::NoTables { page: start_page })?;

    let mut raw = vec![headers.clone()];
    raw.extend(all_rows.clone());

    debug!(
        table_id,
        start_page,
        end_page,
        rows = all_rows.len(),
        "extracted multi-page table"
    );
    Ok(ExtractedTable {
        table_id: table_id.to_string(),
        page: start_page,
        headers,
        rows: all_rows,
        raw,
    })
}

/// A page's data rows: the whole grid, or the grid minus its first row when
/// that row is a (repeated) header.
fn data_rows(grid: &RawGrid, skip_first: bool) -> Vec<Vec<String>> {
    let start = usize::from(skip_first);
    grid[start..].iter().map(|r| normalize_row(r)).collect()
}
