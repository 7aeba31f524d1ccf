//! Per-document pipeline orchestrator.
//!
//! Sequences index → scan → judge → surgery → injection for one converted
//! document and produces a result summary. Each broken table's fix attempt is
//! independent: per-table failures are recorded and never abort the document.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use tablemend_core::{
    BrokenReason, MendError, Scanner, judge_table, table_to_html, table_to_markdown,
};
use tablemend_extract::{IndexBuilder, JsonTableSource, TableIndex, load_meta};

use crate::injection::inject_by_table_id;
use crate::surgery::{MAX_PAGE_SPAN, extract_multipage_table, extract_table};

/// Target format for regenerated tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    /// Pipe-delimited markdown table.
    #[default]
    Markdown,
    /// Tagged thead/tbody block.
    Html,
}

/// Configuration for one document run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Page-tables artifact for the source document.
    pub tables_path: PathBuf,
    /// Converted text document to scan and repair.
    pub text_path: PathBuf,
    /// Conversion metadata document, if available.
    pub meta_path: Option<PathBuf>,
    /// Precomputed index file; preferred over building from metadata.
    pub index_path: Option<PathBuf>,
    /// Output format for regenerated tables.
    pub format: TableFormat,
    /// Diagnose and extract but never mutate the converted text.
    pub dry_run: bool,
    /// Emit per-table progress at info level rather than debug.
    pub verbose: bool,
}

/// Aggregate counts and detail log for one document run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
    pub total_tables: usize,
    pub ok_tables: usize,
    pub fixed_tables: usize,
    pub failed_tables: usize,
    /// Per-table outcome lines, prefixed `ok:`, `fixed:`, or `failed:`.
    pub details: Vec<String>,
}

impl PipelineResult {
    /// Human-readable summary block.
    pub fn summary(&self) -> String {
        let bar = "=".repeat(50);
        format!(
            "{bar}\nPIPELINE SUMMARY\n{bar}\n\
             Total tables:  {}\n\
             OK (no fix):   {}\n\
             Fixed:         {}\n\
             Failed:        {}\n{bar}",
            self.total_tables, self.ok_tables, self.fixed_tables, self.failed_tables
        )
    }

    /// The `failed:` lines of the detail log.
    pub fn failures(&self) -> impl Iterator<Item = &str> {
        self.details
            .iter()
            .map(String::as_str)
            .filter(|d| d.starts_with("failed:"))
    }
}

/// Run the table-integrity pipeline over one document.
///
/// # Errors
///
/// Only document-level input problems are errors: an unreadable page-tables
/// artifact or converted text. Everything downstream — missing pages, failed
/// extraction, failed injection — is recorded per table in the result.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineResult, MendError> {
    let source = JsonTableSource::load(&config.tables_path)?;
    let index = load_or_build_index(config);
    let text = fs::read_to_string(&config.text_path)
        .map_err(|e| MendError::Io(format!("{}: {e}", config.text_path.display())))?;

    let mut locations = Scanner::new().scan(&text);
    for location in &mut locations {
        if let Some(entry) = index.get(&location.table_id) {
            location.page = Some(entry.page);
        }
    }

    let mut result = PipelineResult {
        total_tables: locations.len(),
        ..PipelineResult::default()
    };
    info!(
        tables = locations.len(),
        index_entries = index.len(),
        "scanned {}",
        config.text_path.display()
    );

    for location in locations {
        let quality = judge_table(&location.content, &location.table_id);

        if !quality.is_broken {
            result.ok_tables += 1;
            result.details.push(format!("ok: {}", location.table_id));
            continue;
        }

        if config.verbose {
            info!("{}", quality.summary());
        } else {
            debug!("{}", quality.summary());
        }

        let Some(page) = location.page else {
            result.failed_tables += 1;
            result
                .details
                .push(format!("failed: {}: no page number", location.table_id));
            continue;
        };

        let extracted = if quality.reasons.contains(&BrokenReason::DuplicateHeader) {
            let end_page = index
                .get(&location.table_id)
                .map(|entry| entry.page_end.max(page))
                .filter(|end| *end > page)
                .unwrap_or(page + MAX_PAGE_SPAN - 1);
            extract_multipage_table(&source, page, end_page, &location.table_id)
        } else {
            extract_table(&source, page, &location.table_id)
        };

        let extracted = match extracted {
            Ok(table) => table,
            Err(e) => {
                result.failed_tables += 1;
                result
                    .details
                    .push(format!("failed: {}: {e}", location.table_id));
                continue;
            }
        };

        let new_content = match config.format {
            TableFormat::Markdown => table_to_markdown(&extracted),
            TableFormat::Html => table_to_html(&extracted),
        };

        if config.dry_run {
            result.fixed_tables += 1;
            result
                .details
                .push(format!("fixed: {}: would fix (dry-run)", location.table_id));
            continue;
        }

        let outcome = inject_by_table_id(&config.text_path, &location.table_id, &new_content, true);
        if outcome.success {
            result.fixed_tables += 1;
            result.details.push(format!(
                "fixed: {} ({} lines replaced)",
                location.table_id, outcome.lines_replaced
            ));
        } else {
            result.failed_tables += 1;
            result
                .details
                .push(format!("failed: {}: {}", location.table_id, outcome.message));
        }
    }

    info!(
        ok = result.ok_tables,
        fixed = result.fixed_tables,
        failed = result.failed_tables,
        "pipeline finished"
    );
    Ok(result)
}

/// Index preference: explicit index file, then metadata, then empty.
fn load_or_build_index(config: &PipelineConfig) -> TableIndex {
    if let Some(path) = &config.index_path {
        match TableIndex::load(path) {
            Ok(index) => return index,
            Err(e) => warn!("could not load index: {e}"),
        }
    }

    if let Some(path) = &config.meta_path {
        match load_meta(path) {
            Ok(meta) => return IndexBuilder::new().build_from_meta(&meta),
            Err(e) => warn!("could not load metadata: {e}"),
        }
    }

    warn!("no table index available; page lookup will fail");
    TableIndex::new()
}
