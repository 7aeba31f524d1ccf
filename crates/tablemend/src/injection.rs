//! Splicing corrected tables back into converted text.
//!
//! Replaces a table's line region with newly generated content, preserving
//! leading heading lines and writing a `.bak` copy of the original file
//! before any mutation. Every entry point returns a structured
//! [`InjectionResult`] — injection never panics and never propagates an
//! error past its boundary.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use tablemend_core::{MendError, Scanner};

/// How many leading lines of a region may be preserved as headings.
const MAX_HEADING_LINES: usize = 3;

/// Character cap per side in [`preview_injection`] output.
const PREVIEW_CAP: usize = 500;

/// Terminal outcome of one table-fix attempt.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct InjectionResult {
    pub success: bool,
    pub table_id: String,
    pub message: String,
    pub lines_replaced: usize,
}

impl InjectionResult {
    fn failure(table_id: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            table_id: table_id.to_string(),
            message: message.into(),
            lines_replaced: 0,
        }
    }
}

/// Replace lines `[start_line, end_line)` of the document with `new_content`.
///
/// Up to the first three lines of the region that are `#`-prefixed headings
/// are preserved above the new content, followed by a blank line, the
/// content, and two trailing blank lines. When `backup` is set (the default
/// for callers), the original file is copied to `<path>.bak` before the
/// region is touched; the backup is overwritten on each successive
/// injection. An invalid range fails without mutating anything.
pub fn inject_table(
    path: &Path,
    table_id: &str,
    new_content: &str,
    start_line: usize,
    end_line: usize,
    backup: bool,
) -> InjectionResult {
    match try_inject(path, table_id, new_content, start_line, end_line, backup) {
        Ok(result) => result,
        Err(e) => {
            warn!(table_id, "injection failed: {e}");
            InjectionResult::failure(table_id, e.to_string())
        }
    }
}

fn try_inject(
    path: &Path,
    table_id: &str,
    new_content: &str,
    start_line: usize,
    end_line: usize,
    backup: bool,
) -> Result<InjectionResult, MendError> {
    let text = fs::read_to_string(path)?;
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();

    if end_line > lines.len() || start_line >= end_line {
        return Ok(InjectionResult::failure(
            table_id,
            format!("invalid line range: {start_line}-{end_line}"),
        ));
    }

    if backup {
        fs::write(backup_path(path), &text)?;
    }

    let mut replacement: Vec<String> = Vec::new();
    for line in lines[start_line..end_line.min(start_line + MAX_HEADING_LINES)].iter() {
        if line.trim_start().starts_with('#') {
            replacement.push(line.clone());
        } else {
            break;
        }
    }
    replacement.push(String::new());
    replacement.extend(new_content.lines().map(str::to_string));
    replacement.push(String::new());
    replacement.push(String::new());

    let lines_replaced = end_line - start_line;
    lines.splice(start_line..end_line, replacement);

    fs::write(path, lines.join("\n") + "\n")?;

    debug!(table_id, lines_replaced, "injected table");
    Ok(InjectionResult {
        success: true,
        table_id: table_id.to_string(),
        message: format!("replaced {lines_replaced} lines"),
        lines_replaced,
    })
}

/// Locate a table by identifier and replace its region.
///
/// Uses the scanner's heading-match and boundary rules restricted to the
/// requested identifier. A missing identifier is a structured failure.
pub fn inject_by_table_id(
    path: &Path,
    table_id: &str,
    new_content: &str,
    backup: bool,
) -> InjectionResult {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => return InjectionResult::failure(table_id, format!("I/O error: {e}")),
    };

    match Scanner::new().locate(&text, table_id) {
        Some((start, end)) => inject_table(path, table_id, new_content, start, end, backup),
        None => InjectionResult::failure(table_id, format!("table not found: {table_id}")),
    }
}

/// Non-mutating before/after comparison for a prospective injection.
///
/// Each side is capped at 500 characters. Returns a "table not found"
/// message when the identifier has no region in the document.
pub fn preview_injection(
    path: &Path,
    table_id: &str,
    new_content: &str,
) -> Result<String, MendError> {
    let text = fs::read_to_string(path)?;

    let Some((start, end)) = Scanner::new().locate(&text, table_id) else {
        return Ok(format!("table not found: {table_id}"));
    };

    let lines: Vec<&str> = text.lines().collect();
    let old_content = lines[start..end].join("\n");

    let mut preview = Vec::new();
    preview.push("=".repeat(60));
    preview.push(format!("Table: {table_id}"));
    preview.push(format!("Lines: {start}-{end}"));
    preview.push("=".repeat(60));
    preview.push("\n--- BEFORE ---".to_string());
    preview.push(cap_chars(&old_content));
    preview.push("\n--- AFTER ---".to_string());
    preview.push(cap_chars(new_content));
    preview.push("=".repeat(60));

    Ok(preview.join("\n"))
}

fn backup_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".bak");
    PathBuf::from(os)
}

fn cap_chars(text: &str) -> String {
    if text.chars().count() > PREVIEW_CAP {
        let capped: String = text.chars().take(PREVIEW_CAP).collect();
        format!("{capped}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablemend_core::judge_table;

    const DOC: &str = "\
# Code Volume 1

### Table 9.10.14.4 Maximum Area

| A | B |
|---|---|
|   |   |


after the table
";

    fn write_doc(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("converted.md");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn replaces_region_and_preserves_heading() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, DOC);

        let result =
            inject_by_table_id(&path, "Table 9.10.14.4", "| A | B |\n|---|---|\n| 1 | 2 |", true);
        assert!(result.success, "{}", result.message);
        assert!(result.lines_replaced > 0);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("### Table 9.10.14.4 Maximum Area"));
        assert!(text.contains("| 1 | 2 |"));
        assert!(!text.contains("|   |   |"));
        assert!(text.contains("after the table"));
    }

    #[test]
    fn creates_backup_with_original_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, DOC);

        inject_by_table_id(&path, "Table 9.10.14.4", "| A | B |\n|---|---|\n| 1 | 2 |", true);

        let backup = fs::read_to_string(backup_path(&path)).unwrap();
        assert_eq!(backup, DOC);
    }

    #[test]
    fn backup_can_be_opted_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, DOC);

        inject_by_table_id(&path, "Table 9.10.14.4", "| X |", false);
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn invalid_range_fails_without_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, DOC);

        let result = inject_table(&path, "Table 9.10.14.4", "new", 5, 3, true);
        assert!(!result.success);
        assert!(result.message.contains("invalid line range"));
        assert_eq!(fs::read_to_string(&path).unwrap(), DOC);

        let result = inject_table(&path, "Table 9.10.14.4", "new", 2, 999, true);
        assert!(!result.success);
        assert_eq!(fs::read_to_string(&path).unwrap(), DOC);
    }

    #[test]
    fn unknown_identifier_is_structured_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, DOC);

        let result = inject_by_table_id(&path, "Table 0.0.0.0", "new", true);
        assert!(!result.success);
        assert!(result.message.contains("table not found"));
        assert_eq!(fs::read_to_string(&path).unwrap(), DOC);
    }

    #[test]
    fn missing_file_is_structured_failure() {
        let result =
            inject_by_table_id(Path::new("/nonexistent/doc.md"), "Table 1.1.1.1", "new", true);
        assert!(!result.success);
        assert!(result.message.contains("I/O error"));
    }

    #[test]
    fn injection_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, DOC);
        let content = "| A | B |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |";

        let first = inject_by_table_id(&path, "Table 9.10.14.4", content, true);
        assert!(first.success);
        let after_first = fs::read_to_string(&path).unwrap();

        // Re-scanning finds the table again and its region now holds the
        // heading plus the injected content.
        let located = Scanner::new()
            .locate(&after_first, "Table 9.10.14.4")
            .unwrap();
        let lines: Vec<&str> = after_first.lines().collect();
        let region = lines[located.0..located.1].join("\n");
        assert!(region.starts_with("### Table 9.10.14.4 Maximum Area"));
        assert!(region.contains(content));

        // A second injection with the same content is safe and stable.
        let second = inject_by_table_id(&path, "Table 9.10.14.4", content, true);
        assert!(second.success);
        assert_eq!(fs::read_to_string(&path).unwrap(), after_first);

        // The repaired region now judges sound.
        let quality = judge_table(&region, "Table 9.10.14.4");
        assert!(!quality.is_broken);
    }

    #[test]
    fn preview_shows_both_sides_without_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, DOC);

        let preview = preview_injection(&path, "Table 9.10.14.4", "| new | table |").unwrap();
        assert!(preview.contains("--- BEFORE ---"));
        assert!(preview.contains("--- AFTER ---"));
        assert!(preview.contains("| new | table |"));
        assert!(preview.contains("Table: Table 9.10.14.4"));

        assert_eq!(fs::read_to_string(&path).unwrap(), DOC);
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn preview_caps_long_sides() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, DOC);

        let long_content = "x".repeat(900);
        let preview = preview_injection(&path, "Table 9.10.14.4", &long_content).unwrap();
        assert!(preview.contains(&format!("{}...", "x".repeat(500))));
        assert!(!preview.contains(&long_content));
    }

    #[test]
    fn preview_of_unknown_identifier_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, DOC);

        let preview = preview_injection(&path, "Table 0.0.0.0", "new").unwrap();
        assert_eq!(preview, "table not found: Table 0.0.0.0");
    }
}
