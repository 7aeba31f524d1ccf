use std::path::Path;

use tablemend::{
    JsonTableSource, extract_multipage_table, extract_table, table_to_html, table_to_markdown,
};

use crate::cli::FormatArg;
use crate::page_span::parse_page_span;
use crate::shared::fail;

pub fn run(tables_path: &Path, pages: &str, table_id: &str, format: &FormatArg) -> Result<(), i32> {
    let (start, end) = parse_page_span(pages).map_err(fail)?;
    let source = JsonTableSource::load(tables_path).map_err(fail)?;

    let extracted = if end > start {
        extract_multipage_table(&source, start, end, table_id)
    } else {
        extract_table(&source, start, table_id)
    };
    let table = extracted.map_err(fail)?;

    eprintln!(
        "Extracted {} columns, {} rows from page {}",
        table.headers.len(),
        table.rows.len(),
        table.page
    );

    let rendered = match format {
        FormatArg::Markdown => table_to_markdown(&table),
        FormatArg::Html => table_to_html(&table),
    };
    println!("{rendered}");

    Ok(())
}
