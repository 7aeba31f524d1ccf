//! Table-to-page index.
//!
//! Maps canonical table identifiers to source page numbers. The primary
//! builder reads the conversion metadata (table-of-contents entries first,
//! then table-tagged content blocks as backfill); a slower fallback scans
//! page-level source cell data directly when no metadata is available.
//!
//! Registration is strictly first-wins: a later sighting of an identifier
//! never replaces its page, it can only extend the entry's `page_end` span
//! (a continuation page of the same table).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tablemend_core::{MendError, canonical_id, id_regex};

use crate::meta::ConversionMeta;
use crate::source::TableSource;

/// Where a table lives in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// 1-indexed page of the table's first occurrence.
    pub page: u32,
    /// Last page a sighting of the same identifier was recorded on.
    /// Equal to `page` when no continuation was seen.
    pub page_end: u32,
}

/// Mapping from canonical table identifier to source pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableIndex {
    entries: BTreeMap<String, IndexEntry>,
}

impl TableIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mapped identifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index maps nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an identifier.
    pub fn get(&self, table_id: &str) -> Option<IndexEntry> {
        self.entries.get(table_id).copied()
    }

    /// Record a sighting of `table_id` on `page`.
    ///
    /// The first sighting owns the entry; later sightings only extend
    /// `page_end`. Sightings on page 0 are dropped — absence means "page
    /// unknown", never zero.
    pub fn observe(&mut self, table_id: &str, page: u32) {
        if page == 0 {
            return;
        }
        match self.entries.get_mut(table_id) {
            Some(entry) => {
                if page > entry.page_end {
                    entry.page_end = page;
                }
            }
            None => {
                self.entries.insert(
                    table_id.to_string(),
                    IndexEntry {
                        page,
                        page_end: page,
                    },
                );
            }
        }
    }

    /// Iterate entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, IndexEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), *entry))
    }

    /// Write the index to disk as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), MendError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| MendError::Other(e.to_string()))?;
        fs::write(path, json).map_err(|e| MendError::Io(format!("{}: {e}", path.display())))?;
        debug!(entries = self.len(), "saved index to {}", path.display());
        Ok(())
    }

    /// Load a saved index from disk.
    pub fn load(path: &Path) -> Result<Self, MendError> {
        let text = fs::read_to_string(path)
            .map_err(|e| MendError::Io(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| MendError::Parse(format!("{}: {e}", path.display())))
    }
}

/// Builds a [`TableIndex`] from conversion metadata or raw source data.
///
/// Holds the compiled identifier pattern; construct once and reuse.
#[derive(Debug)]
pub struct IndexBuilder {
    pattern: Regex,
}

impl IndexBuilder {
    /// Create a builder with the standard identifier pattern.
    pub fn new() -> Self {
        Self {
            pattern: id_regex(),
        }
    }

    /// Build from a conversion metadata document.
    ///
    /// Table-of-contents entries register first; table-tagged content blocks
    /// backfill identifiers the table of contents missed. Neither overrides
    /// the other — first source wins.
    pub fn build_from_meta(&self, meta: &ConversionMeta) -> TableIndex {
        let mut index = TableIndex::new();

        for entry in &meta.table_of_contents {
            if let Some(caps) = self.pattern.captures(&entry.title) {
                index.observe(&canonical_id(&caps[1]), entry.page);
            }
        }

        for block in meta.blocks.iter().filter(|b| b.is_table()) {
            if let Some(caps) = self.pattern.captures(&block.text) {
                index.observe(&canonical_id(&caps[1]), block.page);
            }
        }

        debug!(entries = index.len(), "built index from metadata");
        index
    }

    /// Build by scanning page-level source cell data.
    ///
    /// The slow path, used only when no metadata document is available:
    /// walks every page of the source and matches the identifier pattern
    /// against every cell. A page that fails to yield grids is skipped.
    pub fn build_from_source(&self, source: &dyn TableSource) -> TableIndex {
        let mut index = TableIndex::new();

        for page in 1..=source.page_count() as u32 {
            let grids = match source.page_tables(page) {
                Ok(grids) => grids,
                Err(e) => {
                    warn!(page, "skipping page during index scan: {e}");
                    continue;
                }
            };
            for grid in &grids {
                for row in grid {
                    for cell in row.iter().flatten() {
                        for caps in self.pattern.captures_iter(cell) {
                            index.observe(&canonical_id(&caps[1]), page);
                        }
                    }
                }
            }
        }

        debug!(entries = index.len(), "built index from source scan");
        index
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}
