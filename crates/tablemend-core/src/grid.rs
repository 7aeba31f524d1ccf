//! Extracted table grids and their text renderings.
//!
//! An [`ExtractedTable`] is the normalized result of re-extracting a table
//! from page-level source data: one header row plus data rows. This module
//! renders a grid as a pipe-delimited markdown table or as a tagged
//! (thead/tbody) block for splicing back into converted text.

/// Maximum rendered cell width in markdown output, in characters.
pub const MAX_CELL_WIDTH: usize = 50;

/// A table re-extracted from page-level source data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractedTable {
    /// Canonical table identifier.
    pub table_id: String,
    /// 1-indexed source page (first page for multi-page tables).
    pub page: u32,
    /// Header row. Never empty.
    pub headers: Vec<String>,
    /// Data rows, in source order.
    pub rows: Vec<Vec<String>>,
    /// The unprocessed grid: header followed by data rows.
    pub raw: Vec<Vec<String>>,
}

/// Collapse a cell to a single line and cap its width.
fn clean_cell(text: &str) -> String {
    let one_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if one_line.chars().count() > MAX_CELL_WIDTH {
        one_line.chars().take(MAX_CELL_WIDTH).collect()
    } else {
        one_line
    }
}

/// Render a grid as a markdown table.
///
/// Emits a header row, a divider of the header's column count, and data rows
/// right-padded or truncated to the header's column count. Cells are
/// collapsed to one line and capped at [`MAX_CELL_WIDTH`] characters.
pub fn table_to_markdown(table: &ExtractedTable) -> String {
    let width = table.headers.len();
    let mut lines = Vec::with_capacity(table.rows.len() + 2);

    let headers: Vec<String> = table.headers.iter().map(|h| clean_cell(h)).collect();
    lines.push(format!("| {} |", headers.join(" | ")));
    lines.push(format!("|{}|", vec!["---"; width].join("|")));

    for row in &table.rows {
        let mut cells: Vec<String> = row.iter().take(width).map(|c| clean_cell(c)).collect();
        while cells.len() < width {
            cells.push(String::new());
        }
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    lines.join("\n")
}

/// Render a grid as a tagged semantic table (thead/tbody).
///
/// Cells are escaped but not width-capped; data cells beyond the header's
/// column count are dropped.
pub fn table_to_html(table: &ExtractedTable) -> String {
    let width = table.headers.len();
    let mut lines = vec!["<table class=\"code-table\">".to_string()];

    lines.push("  <thead>".to_string());
    lines.push("    <tr>".to_string());
    for header in &table.headers {
        lines.push(format!("      <th>{}</th>", escape_html(header)));
    }
    lines.push("    </tr>".to_string());
    lines.push("  </thead>".to_string());

    lines.push("  <tbody>".to_string());
    for row in &table.rows {
        lines.push("    <tr>".to_string());
        for cell in row.iter().take(width) {
            lines.push(format!("      <td>{}</td>", escape_html(cell)));
        }
        lines.push("    </tr>".to_string());
    }
    lines.push("  </tbody>".to_string());

    lines.push("</table>".to_string());
    lines.join("\n")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
