//! Table-region scanning for converted text.
//!
//! Finds every table heading (`## Table <id>` through `#### Table <id>`) in a
//! converted document and returns the line range and raw content of each
//! table's region. The same boundary rule is reused by injection to locate a
//! single table by identifier.

use std::collections::HashSet;

use regex::Regex;

use crate::ident::{TABLE_ID_PATTERN, canonical_id, numeric_part};

/// A table's position within a converted text document.
///
/// Line offsets are 0-indexed and `end_line` is exclusive. `page` is `None`
/// until back-filled from the table index.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableLocation {
    /// Canonical table identifier (`"Table <id>"`).
    pub table_id: String,
    /// First line of the region (the heading line itself).
    pub start_line: usize,
    /// One past the last line of the region.
    pub end_line: usize,
    /// Raw text of the region, heading included.
    pub content: String,
    /// 1-indexed source page, once known.
    pub page: Option<u32>,
}

/// Scans converted text for table regions.
///
/// Holds the compiled heading pattern; construct once and reuse across
/// documents.
#[derive(Debug)]
pub struct Scanner {
    heading: Regex,
}

impl Scanner {
    /// Create a scanner with the standard heading pattern (heading depth 2-4).
    pub fn new() -> Self {
        let heading = Regex::new(&format!(r"(?i)^#{{2,4}}\s+Table\s+({TABLE_ID_PATTERN})"))
            .expect("heading pattern is valid");
        Self { heading }
    }

    /// Find every table region in `text`, in document order.
    ///
    /// A region starts at its heading line and ends at the next heading line
    /// or at the second of two consecutive blank lines, whichever comes
    /// first; a table with neither extends to end of document. Regions never
    /// overlap. When the same identifier appears more than once, only the
    /// first occurrence is returned, but the scan still resumes past the
    /// later region.
    pub fn scan(&self, text: &str) -> Vec<TableLocation> {
        let lines: Vec<&str> = text.lines().collect();
        let mut tables = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        let mut i = 0;
        while i < lines.len() {
            let caps = match self.heading.captures(lines[i]) {
                Some(caps) => caps,
                None => {
                    i += 1;
                    continue;
                }
            };

            let table_id = canonical_id(&caps[1]);
            let end = region_end(&lines, i);

            if seen.insert(table_id.clone()) {
                tables.push(TableLocation {
                    table_id,
                    start_line: i,
                    end_line: end,
                    content: lines[i..end].join("\n"),
                    page: None,
                });
            }

            i = end;
        }

        tables
    }

    /// Locate one table by canonical identifier.
    ///
    /// Returns the `[start, end)` line range using the same boundary rule as
    /// [`scan`](Self::scan), or `None` if no heading for the identifier
    /// exists.
    pub fn locate(&self, text: &str, table_id: &str) -> Option<(usize, usize)> {
        let escaped = regex::escape(numeric_part(table_id));
        let pattern = Regex::new(&format!(r"(?i)^#{{2,4}}\s+Table\s+{escaped}\b")).ok()?;

        let lines: Vec<&str> = text.lines().collect();
        for (i, line) in lines.iter().enumerate() {
            if pattern.is_match(line) {
                return Some((i, region_end(&lines, i)));
            }
        }
        None
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward-scan from a heading at `start` to the region's exclusive end.
///
/// Stops before the next `#`-prefixed line, or at the second of two
/// consecutive blank lines (the first blank stays inside the region).
fn region_end(lines: &[&str], start: usize) -> usize {
    let mut j = start + 1;
    let mut blanks = 0;

    while j < lines.len() {
        if lines[j].starts_with('#') {
            break;
        }
        if lines[j].trim().is_empty() {
            blanks += 1;
            if blanks >= 2 {
                break;
            }
        } else {
            blanks = 0;
        }
        j += 1;
    }

    j
}
