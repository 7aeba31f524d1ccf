//! Structural quality judging for converted table regions.
//!
//! Classifies a scanned table region as sound or broken against a fixed set
//! of independent heuristics, producing a reason set, diagnostic details, and
//! a confidence score. Judging is a pure function over the region's text; it
//! always returns a verdict and never fails.

use std::fmt;

/// Why a table region was judged broken.
///
/// Checks are independent; a region can accumulate several reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BrokenReason {
    /// Fewer than two pipe-bearing lines; the region is flat prose.
    NoPipes,
    /// Column counts vary by more than one across pipe-bearing lines.
    ColMismatch,
    /// More than a quarter of cells are empty.
    EmptyCells,
    /// Most data rows have an empty first cell (merged rowspan not repeated).
    RowspanBroken,
    /// Header and divider only, no data rows.
    NoData,
    /// The header line repeats; the table was split across pages.
    DuplicateHeader,
    /// The content carries an ellipsis or a truncation marker.
    Truncated,
}

impl BrokenReason {
    /// Stable machine-readable code for this reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            BrokenReason::NoPipes => "NO_PIPES",
            BrokenReason::ColMismatch => "COL_MISMATCH",
            BrokenReason::EmptyCells => "EMPTY_CELLS",
            BrokenReason::RowspanBroken => "ROWSPAN_BROKEN",
            BrokenReason::NoData => "NO_DATA",
            BrokenReason::DuplicateHeader => "DUPLICATE_HEADER",
            BrokenReason::Truncated => "TRUNCATED",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            BrokenReason::NoPipes => "flat text (no markdown table)",
            BrokenReason::ColMismatch => "column count mismatch",
            BrokenReason::EmptyCells => "too many empty cells",
            BrokenReason::RowspanBroken => "rowspan structure broken",
            BrokenReason::NoData => "no data rows",
            BrokenReason::DuplicateHeader => "multi-page split",
            BrokenReason::Truncated => "content truncated",
        }
    }
}

impl fmt::Display for BrokenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The verdict for one table region.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableQuality {
    /// Canonical table identifier the verdict belongs to.
    pub table_id: String,
    /// Whether any heuristic matched.
    pub is_broken: bool,
    /// Reasons in check order. Empty when sound.
    pub reasons: Vec<BrokenReason>,
    /// Free-text diagnostics, one per matched check.
    pub details: Vec<String>,
    /// Confidence in the verdict, in `[0, 1]`.
    pub confidence: f64,
}

impl TableQuality {
    /// One-line summary, e.g. `Table 9.10.14.4: COL_MISMATCH, NO_DATA`.
    pub fn summary(&self) -> String {
        if !self.is_broken {
            return format!("{}: OK", self.table_id);
        }
        let reasons: Vec<&str> = self.reasons.iter().map(BrokenReason::as_str).collect();
        format!("{}: {}", self.table_id, reasons.join(", "))
    }
}

/// Pipe lines carrying fewer empty-cell patterns than this ratio are fine.
const EMPTY_CELL_RATIO: f64 = 0.25;
/// First-cell-empty ratio above which a rowspan is considered broken.
const EMPTY_FIRST_CELL_RATIO: f64 = 0.4;

/// Judge one table region's raw text.
///
/// All checks run and every match accumulates a reason, except the flat-text
/// check which short-circuits: a region without at least two pipe-bearing
/// lines is unstructured prose and nothing else applies.
pub fn judge_table(content: &str, table_id: &str) -> TableQuality {
    let mut result = TableQuality {
        table_id: table_id.to_string(),
        is_broken: false,
        reasons: Vec::new(),
        details: Vec::new(),
        confidence: 0.9,
    };

    let table_lines: Vec<&str> = content
        .trim()
        .lines()
        .filter(|l| l.contains('|') && !l.trim_start().starts_with('#'))
        .collect();

    // 1. Flat text. The only early exit.
    if table_lines.len() < 2 {
        result.is_broken = true;
        result.reasons.push(BrokenReason::NoPipes);
        result
            .details
            .push(format!("only {} lines with pipes", table_lines.len()));
        result.confidence = 0.95;
        return result;
    }

    // 2. Column count consistency.
    let col_counts: Vec<usize> = table_lines
        .iter()
        .map(|l| l.matches('|').count() - 1)
        .collect();
    let min_cols = col_counts.iter().copied().min().unwrap_or(0);
    let max_cols = col_counts.iter().copied().max().unwrap_or(0);
    if max_cols - min_cols > 1 {
        result.is_broken = true;
        result.reasons.push(BrokenReason::ColMismatch);
        result
            .details
            .push(format!("columns vary: {min_cols}~{max_cols}"));
    }

    // 3. Empty cell ratio, against half the total pipe count. Only evaluated
    // for regions with enough pipes to make the ratio meaningful.
    let total_pipes = content.matches('|').count();
    if total_pipes > 10 {
        let empty_patterns = content.matches("| |").count()
            + content.matches("||").count()
            + content.matches("|  |").count();
        let empty_ratio = empty_patterns as f64 / (total_pipes as f64 / 2.0);
        if empty_ratio > EMPTY_CELL_RATIO {
            result.is_broken = true;
            result.reasons.push(BrokenReason::EmptyCells);
            result
                .details
                .push(format!("empty cell ratio: {:.0}%", empty_ratio * 100.0));
        }
    }

    // 4. Rowspan breakage: empty first cells down the data rows.
    if table_lines.len() > 3 {
        let first_cells: Vec<&str> = table_lines[2..]
            .iter()
            .filter_map(|l| l.split('|').nth(1))
            .map(str::trim)
            .collect();
        if !first_cells.is_empty() {
            let empty_first = first_cells.iter().filter(|c| c.is_empty()).count();
            if empty_first as f64 / first_cells.len() as f64 > EMPTY_FIRST_CELL_RATIO {
                result.is_broken = true;
                result.reasons.push(BrokenReason::RowspanBroken);
                result.details.push(format!(
                    "{empty_first}/{} empty first cells",
                    first_cells.len()
                ));
            }
        }
    }

    // 5. Data rows, after header and divider.
    if table_lines.len() < 3 {
        result.is_broken = true;
        result.reasons.push(BrokenReason::NoData);
        result.details.push("header only, no data".to_string());
    }

    // 6. Repeated header means a multi-page split.
    let header = table_lines[0];
    let header_count = table_lines.iter().filter(|l| **l == header).count();
    if header_count > 1 {
        result.is_broken = true;
        result.reasons.push(BrokenReason::DuplicateHeader);
        result
            .details
            .push(format!("header repeated {header_count} times"));
    }

    // 7. Truncation markers.
    if content.contains("...") || content.to_lowercase().contains("truncated") {
        result.is_broken = true;
        result.reasons.push(BrokenReason::Truncated);
    }

    if result.is_broken {
        result.confidence = (0.5 + result.reasons.len() as f64 * 0.12).min(0.95);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOUND: &str = "\
### Table 9.10.14.4 Maximum Area

| Distance | Residential | Other |
|----------|-------------|-------|
| 1.2 m    | 0.2         | 0.1   |
| 2.0 m    | 0.5         | 0.3   |
";

    #[test]
    fn sound_table_has_empty_reason_list() {
        let q = judge_table(SOUND, "Table 9.10.14.4");
        assert!(!q.is_broken);
        assert!(q.reasons.is_empty());
        assert!(q.details.is_empty());
        assert_eq!(q.confidence, 0.9);
        assert_eq!(q.summary(), "Table 9.10.14.4: OK");
    }

    #[test]
    fn flat_text_is_no_pipes_only() {
        let q = judge_table("just prose\nwith no structure at all", "Table 1.1.1.1");
        assert!(q.is_broken);
        assert_eq!(q.reasons, vec![BrokenReason::NoPipes]);
        assert_eq!(q.confidence, 0.95);
    }

    #[test]
    fn one_pipe_line_is_still_flat() {
        let q = judge_table("| lonely | row |", "Table 1.1.1.1");
        assert_eq!(q.reasons, vec![BrokenReason::NoPipes]);
        assert_eq!(q.confidence, 0.95);
    }

    #[test]
    fn heading_lines_do_not_count_as_pipe_lines() {
        // A heading containing a pipe must not rescue a flat region.
        let q = judge_table("## Table 1.1.1.1 | note\nprose", "Table 1.1.1.1");
        assert_eq!(q.reasons, vec![BrokenReason::NoPipes]);
    }

    #[test]
    fn consistent_columns_pass() {
        let content = "| A | B | C |\n|---|---|---|\n| 1 | 2 | 3 |";
        let q = judge_table(content, "Table 1.1.1.1");
        assert!(!q.reasons.contains(&BrokenReason::ColMismatch));
    }

    #[test]
    fn column_variance_of_two_is_flagged() {
        // Column counts {3, 3, 5}: variance 2.
        let content = "| A | B | C |\n|---|---|---|\n| 1 | 2 | 3 | 4 | 5 |";
        let q = judge_table(content, "Table 1.1.1.1");
        assert!(q.reasons.contains(&BrokenReason::ColMismatch));
    }

    #[test]
    fn column_variance_of_one_is_tolerated() {
        let content = "| A | B | C |\n|---|---|---|\n| 1 | 2 | 3 | 4 |";
        let q = judge_table(content, "Table 1.1.1.1");
        assert!(!q.reasons.contains(&BrokenReason::ColMismatch));
    }

    #[test]
    fn empty_cells_flagged_above_quarter_ratio() {
        let content = "\
| A | B | C |
|---|---|---|
|  |  |  |
|  |  |  |
|  |  |  |
";
        let q = judge_table(content, "Table 1.1.1.1");
        assert!(q.reasons.contains(&BrokenReason::EmptyCells));
    }

    #[test]
    fn empty_cell_check_skipped_for_small_tables() {
        // 8 pipes total: below the 10-pipe evaluation threshold.
        let content = "| A |\n|---|\n|  |\n|  |";
        let q = judge_table(content, "Table 1.1.1.1");
        assert!(!q.reasons.contains(&BrokenReason::EmptyCells));
    }

    #[test]
    fn rowspan_broken_when_most_first_cells_empty() {
        // 3 data rows, 2 with an empty first cell (>40%).
        let content = "\
| Load | Value |
|------|-------|
| roof | 1.0   |
|      | 2.0   |
|      | 3.0   |
";
        let q = judge_table(content, "Table 4.1.5.3");
        assert!(q.reasons.contains(&BrokenReason::RowspanBroken));
    }

    #[test]
    fn rowspan_intact_when_first_cells_filled() {
        let content = "\
| Load | Value |
|------|-------|
| roof | 1.0   |
| wind | 2.0   |
| snow | 3.0   |
";
        let q = judge_table(content, "Table 4.1.5.3");
        assert!(!q.reasons.contains(&BrokenReason::RowspanBroken));
    }

    #[test]
    fn header_and_divider_only_is_no_data() {
        let content = "| A | B |\n|---|---|";
        let q = judge_table(content, "Table 1.1.1.1");
        assert!(q.is_broken);
        assert!(q.reasons.contains(&BrokenReason::NoData));
    }

    #[test]
    fn duplicate_header_flagged_when_repeated() {
        let content = "\
| A | B |
|---|---|
| 1 | 2 |
| A | B |
|---|---|
| 3 | 4 |
";
        let q = judge_table(content, "Table 1.1.1.1");
        assert!(q.reasons.contains(&BrokenReason::DuplicateHeader));
    }

    #[test]
    fn header_appearing_once_is_not_duplicate() {
        let content = "| A | B |\n|---|---|\n| 1 | 2 |";
        let q = judge_table(content, "Table 1.1.1.1");
        assert!(!q.reasons.contains(&BrokenReason::DuplicateHeader));
    }

    #[test]
    fn ellipsis_marks_truncated() {
        let content = "| A | B |\n|---|---|\n| 1 | ... |";
        let q = judge_table(content, "Table 1.1.1.1");
        assert!(q.reasons.contains(&BrokenReason::Truncated));
    }

    #[test]
    fn truncated_keyword_is_case_insensitive() {
        let content = "| A | B |\n|---|---|\n| 1 | [Truncated] |";
        let q = judge_table(content, "Table 1.1.1.1");
        assert!(q.reasons.contains(&BrokenReason::Truncated));
    }

    #[test]
    fn confidence_grows_with_reason_count() {
        // NO_DATA + DUPLICATE_HEADER: 0.5 + 2 * 0.12.
        let content = "| A | B |\n| A | B |";
        let q = judge_table(content, "Table 1.1.1.1");
        assert_eq!(q.reasons.len(), 2);
        assert!((q.confidence - 0.74).abs() < 1e-9);
    }

    #[test]
    fn confidence_is_capped() {
        // Many reasons at once: 0.5 + n * 0.12 clamps to 0.95.
        let content = "\
| A | B |
|  |  |
|  |  |  |  |
| A | B |
| ... |
";
        let q = judge_table(content, "Table 1.1.1.1");
        assert!(q.reasons.len() >= 4);
        assert_eq!(q.confidence, 0.95);
    }

    #[test]
    fn summary_lists_reason_codes() {
        let content = "| A | B |\n| A | B |";
        let q = judge_table(content, "Table 1.1.1.1");
        assert_eq!(q.summary(), "Table 1.1.1.1: NO_DATA, DUPLICATE_HEADER");
    }
}
