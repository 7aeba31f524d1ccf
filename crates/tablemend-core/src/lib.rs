//! tablemend-core: Source-independent data types and algorithms.
//!
//! This crate provides the foundational types (TableLocation, TableQuality,
//! ExtractedTable) and the pure text algorithms of the table-integrity
//! pipeline: identifier canonicalization, table-region scanning, structural
//! quality judging, and grid formatting. It performs no file or source I/O.

pub mod error;
pub mod grid;
pub mod ident;
pub mod judge;
pub mod scanner;

pub use error::MendError;
pub use grid::{ExtractedTable, MAX_CELL_WIDTH, table_to_html, table_to_markdown};
pub use ident::{TABLE_ID_PATTERN, canonical_id, find_table_id, id_regex, numeric_part};
pub use judge::{BrokenReason, TableQuality, judge_table};
pub use scanner::{Scanner, TableLocation};
