//! Conversion metadata model.
//!
//! The external document converter emits a metadata document next to the
//! converted text: a table of contents (`{title, page}` entries) and a list
//! of typed content blocks (`{type, text, page}`). Only the parts relevant
//! to table-page lookup are modeled; unknown fields are ignored. The
//! converter's native field name for pages is `page_id`, accepted as an
//! alias.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use tablemend_core::MendError;

/// A converter metadata document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversionMeta {
    /// Table-of-contents entries, in document order.
    #[serde(default)]
    pub table_of_contents: Vec<TocEntry>,
    /// Typed content blocks, in document order.
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
}

/// One table-of-contents entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TocEntry {
    #[serde(default)]
    pub title: String,
    /// 1-indexed page; 0 when the converter did not record one.
    #[serde(default, alias = "page_id")]
    pub page: u32,
}

/// One typed content block.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    /// Block type tag, e.g. `"Table"`.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    /// 1-indexed page; 0 when the converter did not record one.
    #[serde(default, alias = "page_id")]
    pub page: u32,
}

impl ContentBlock {
    /// Whether this block is tagged as a table.
    pub fn is_table(&self) -> bool {
        self.kind.eq_ignore_ascii_case("table")
    }
}

/// Load a metadata document from disk.
///
/// # Errors
///
/// [`MendError::Io`] when the file cannot be read, [`MendError::Parse`] when
/// it is not valid JSON. Callers degrade a failed load to an empty index.
pub fn load_meta(path: &Path) -> Result<ConversionMeta, MendError> {
    let text =
        fs::read_to_string(path).map_err(|e| MendError::Io(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&text).map_err(|e| MendError::Parse(format!("{}: {e}", path.display())))
}
