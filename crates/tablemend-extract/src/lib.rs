//! tablemend-extract: the source-data layer of the table-integrity pipeline.
//!
//! Provides the [`TableSource`] trait abstracting page-indexed tabular cell
//! data (produced by an external structured-table extractor), the
//! [`JsonTableSource`] file-artifact backend, the conversion-metadata model,
//! and the [`IndexBuilder`] mapping table identifiers to source pages.

pub mod index;
pub mod json_source;
pub mod meta;
pub mod source;

pub use index::{IndexBuilder, IndexEntry, TableIndex};
pub use json_source::JsonTableSource;
pub use meta::{ContentBlock, ConversionMeta, TocEntry, load_meta};
pub use source::{RawGrid, TableSource};
