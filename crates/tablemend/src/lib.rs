//! tablemend: table-integrity pipeline for machine-converted documents.
//!
//! Conversion tools frequently mangle tables when turning paginated source
//! documents into markdown (flattened columns, dropped rowspans, tables split
//! across pages with duplicated headers). This crate locates tables in
//! converted text, classifies each as sound or broken, re-extracts broken
//! ones from page-level source data, and splices the corrected content back
//! in — per document and corpus-wide.
//!
//! # Architecture
//!
//! - **tablemend-core**: source-independent types and pure text algorithms
//!   (scanner, judge, grid formatting)
//! - **tablemend-extract**: the source-data layer (table source trait, JSON
//!   artifact backend, metadata model, index builder)
//! - **tablemend** (this crate): surgery, injection, the per-document
//!   pipeline orchestrator, and the batch runner

pub mod batch;
pub mod convert;
pub mod injection;
pub mod pipeline;
pub mod surgery;

pub use tablemend_core::{
    BrokenReason, ExtractedTable, MendError, Scanner, TableLocation, TableQuality, judge_table,
    table_to_html, table_to_markdown,
};
pub use tablemend_extract::{
    ConversionMeta, IndexBuilder, IndexEntry, JsonTableSource, RawGrid, TableIndex, TableSource,
    load_meta,
};

pub use batch::{BatchConfig, BatchReport, DocumentRecord, ProcessingOrder, run_batch};
pub use convert::{ConvertError, Converter, DEFAULT_TIMEOUT};
pub use injection::{InjectionResult, inject_by_table_id, inject_table, preview_injection};
pub use pipeline::{PipelineConfig, PipelineResult, TableFormat, run_pipeline};
pub use surgery::{MAX_PAGE_SPAN, extract_multipage_table, extract_table};
