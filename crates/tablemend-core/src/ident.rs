//! Canonical table identifiers.
//!
//! Tables are keyed by the canonical string `"Table <id>"`, where `<id>` is a
//! dotted numeric identifier such as `9.10.14.4`, optionally carrying a
//! division-letter prefix (`A-9.10.14.4`) or a trailing letter suffix
//! (`9.10.14.4A`, `9.10.14.4-B`). The scanner and the index builder both
//! canonicalize through this module so their results are joinable by plain
//! string equality.

use regex::Regex;

/// Pattern for the identifier part after the word "Table".
///
/// Division-letter prefix, dotted numeric body, optional letter suffix and
/// optional `-<letter>` suffix.
pub const TABLE_ID_PATTERN: &str = r"(?:[A-Z]-)?\d+(?:\.\d+)*[A-Z]?(?:-[A-Z])?";

/// Compile the case-insensitive `Table <id>` regex with the identifier in
/// capture group 1.
///
/// Callers that match repeatedly should compile once and hold the result
/// rather than calling this in a loop.
pub fn id_regex() -> Regex {
    Regex::new(&format!(r"(?i)Table\s+({TABLE_ID_PATTERN})")).expect("table id pattern is valid")
}

/// Canonicalize a raw identifier part into the `"Table <id>"` form.
///
/// Letters are uppercased and surrounding whitespace is dropped, so
/// `"table 9.10.14.4a"` and `"Table  9.10.14.4A"` map to the same key.
pub fn canonical_id(id_part: &str) -> String {
    format!("Table {}", id_part.trim().to_uppercase())
}

/// Find the first table identifier in `text`, canonicalized.
pub fn find_table_id(text: &str) -> Option<String> {
    id_regex()
        .captures(text)
        .map(|caps| canonical_id(&caps[1]))
}

/// The identifier part of a canonical id, without the `Table ` prefix.
pub fn numeric_part(table_id: &str) -> &str {
    table_id
        .strip_prefix("Table ")
        .or_else(|| table_id.strip_prefix("table "))
        .unwrap_or(table_id)
        .trim()
}
