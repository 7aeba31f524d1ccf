//! Corpus batch runner.
//!
//! Discovers a directory of source documents, orders them by a fixed priority
//! table, skips documents whose conversion output already exists, runs the
//! external converter and the per-document pipeline, and aggregates a
//! corpus-level report. Documents are processed strictly in sequence; a
//! whole-batch run completes even if every document fails.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use tablemend_core::MendError;

use crate::convert::Converter;
use crate::pipeline::{PipelineConfig, TableFormat, run_pipeline};

/// Priority table for corpus processing order.
///
/// Patterns are matched case-insensitively against the file stem, first
/// match wins; unmatched files sort last. The default order processes
/// national codes first, then regional and provincial codes, then user
/// guides.
#[derive(Debug, Clone)]
pub struct ProcessingOrder {
    rules: Vec<(String, u32)>,
}

/// Priority assigned to files no rule matches.
const UNMATCHED_PRIORITY: u32 = 99;

impl Default for ProcessingOrder {
    fn default() -> Self {
        let rules = [
            // National
            ("nbc2025", 1),
            ("nfc2025", 2),
            ("npc2025", 3),
            ("necb2025", 4),
            // British Columbia
            ("bcbc", 5),
            // Alberta
            ("nbcae", 6),
            // Provincial
            ("obc", 7),
            ("qcc", 8),
            ("qecb", 9),
            ("qpc", 10),
            ("qsc", 11),
            // User guides
            ("ugp4", 12),
            ("ugnecb", 13),
            ("iugp9", 14),
            ("ugp9", 14),
        ];
        Self {
            rules: rules
                .iter()
                .map(|(pattern, priority)| (pattern.to_string(), *priority))
                .collect(),
        }
    }
}

impl ProcessingOrder {
    /// Priority for one file, from its stem.
    pub fn priority(&self, path: &Path) -> u32 {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        self.rules
            .iter()
            .find(|(pattern, _)| stem.contains(pattern))
            .map(|(_, priority)| *priority)
            .unwrap_or(UNMATCHED_PRIORITY)
    }

    /// Stable-sort files by priority; ties keep their existing order.
    pub fn sort(&self, files: &mut [PathBuf]) {
        files.sort_by_key(|path| self.priority(path));
    }
}

/// Corpus-level configuration.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory of raw source documents (`*.pdf`).
    pub sources_dir: PathBuf,
    /// Directory receiving per-document conversion output subdirectories.
    pub output_dir: PathBuf,
    /// Run the external converter for unprocessed documents.
    pub run_convert: bool,
    /// Run the repair pipeline over conversion outputs.
    pub run_repair: bool,
    /// Diagnose only; mutate nothing and run no converter.
    pub dry_run: bool,
    /// External converter invocation.
    pub converter: Converter,
    /// Output format for regenerated tables.
    pub format: TableFormat,
}

/// Outcome of one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentRecord {
    pub name: String,
    pub convert_ok: bool,
    pub pipeline_ok: bool,
    pub tables_total: usize,
    pub tables_fixed: usize,
    pub error: String,
    pub skipped: bool,
}

/// Aggregated corpus report.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub records: Vec<DocumentRecord>,
    pub elapsed_secs: f64,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.records.iter().filter(|r| r.skipped).count()
    }

    pub fn convert_ok_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.convert_ok && !r.skipped)
            .count()
    }

    pub fn pipeline_ok_count(&self) -> usize {
        self.records.iter().filter(|r| r.pipeline_ok).count()
    }

    pub fn tables_fixed_total(&self) -> usize {
        self.records.iter().map(|r| r.tables_fixed).sum()
    }

    /// Non-skipped documents that failed conversion or the pipeline.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.records
            .iter()
            .filter(|r| !r.skipped && !(r.convert_ok && r.pipeline_ok))
    }

    /// Human-readable summary block.
    pub fn summary(&self) -> String {
        let bar = "=".repeat(60);
        format!(
            "{bar}\nBATCH SUMMARY\n{bar}\n\
             Total documents:  {}\n\
             Skipped:          {}\n\
             Converted OK:     {}\n\
             Pipeline OK:      {}\n\
             Tables fixed:     {}\n\
             Elapsed:          {:.1}s\n{bar}",
            self.total(),
            self.skipped_count(),
            self.convert_ok_count(),
            self.pipeline_ok_count(),
            self.tables_fixed_total(),
            self.elapsed_secs
        )
    }

    /// Serialize the per-document records to a pretty-JSON report file.
    pub fn save(&self, path: &Path) -> Result<(), MendError> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| MendError::Other(e.to_string()))?;
        fs::write(path, json).map_err(|e| MendError::Io(format!("{}: {e}", path.display())))?;
        Ok(())
    }
}

/// Process every source document in the corpus.
///
/// # Errors
///
/// Only a missing or unreadable sources directory is an error; every
/// per-document failure is recorded in the report instead.
pub fn run_batch(config: &BatchConfig) -> Result<BatchReport, MendError> {
    let mut files = discover_sources(&config.sources_dir)?;
    ProcessingOrder::default().sort(&mut files);

    info!(documents = files.len(), "starting batch run");
    let started = Instant::now();

    let mut records = Vec::with_capacity(files.len());
    for (i, path) in files.iter().enumerate() {
        info!("[{}/{}] {}", i + 1, files.len(), path.display());
        records.push(process_document(path, config));
    }

    Ok(BatchReport {
        records,
        elapsed_secs: started.elapsed().as_secs_f64(),
    })
}

/// Source documents, name-sorted so the priority sort's tie order is
/// deterministic regardless of filesystem enumeration.
fn discover_sources(dir: &Path) -> Result<Vec<PathBuf>, MendError> {
    let entries =
        fs::read_dir(dir).map_err(|e| MendError::Io(format!("{}: {e}", dir.display())))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Folder-name normalization used by the converter: lowercase, spaces to
/// underscores.
fn normalize_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase().replace(' ', "_"))
        .unwrap_or_default()
}

/// A document is already processed when its output subdirectory holds at
/// least one converted text file and one metadata file.
fn already_processed(output_dir: &Path, stem: &str) -> bool {
    let doc_dir = output_dir.join(stem);
    if !doc_dir.is_dir() {
        return false;
    }
    let outputs = find_outputs_in(&doc_dir);
    outputs.text.is_some() && outputs.meta.is_some()
}

#[derive(Debug, Default)]
struct ConvertedOutputs {
    text: Option<PathBuf>,
    meta: Option<PathBuf>,
    tables: Option<PathBuf>,
}

/// Locate conversion artifacts for a document: in its own output
/// subdirectory first, then directly under the output directory.
fn find_outputs(output_dir: &Path, stem: &str) -> ConvertedOutputs {
    for dir in [output_dir.join(stem), output_dir.to_path_buf()] {
        if !dir.is_dir() {
            continue;
        }
        let outputs = find_outputs_in(&dir);
        if outputs.text.is_some() && outputs.meta.is_some() {
            return outputs;
        }
    }
    ConvertedOutputs::default()
}

fn find_outputs_in(dir: &Path) -> ConvertedOutputs {
    let mut names: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect(),
        Err(_) => return ConvertedOutputs::default(),
    };
    names.sort();

    let mut outputs = ConvertedOutputs::default();
    for path in names {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => continue,
        };
        if outputs.text.is_none() && name.ends_with(".md") {
            outputs.text = Some(path);
        } else if outputs.meta.is_none() && (name.ends_with("_meta.json") || name == "meta.json") {
            outputs.meta = Some(path);
        } else if outputs.tables.is_none() && name.ends_with("_tables.json") {
            outputs.tables = Some(path);
        }
    }
    outputs
}

fn process_document(path: &Path, config: &BatchConfig) -> DocumentRecord {
    let mut record = DocumentRecord {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        ..DocumentRecord::default()
    };
    let stem = normalize_stem(path);

    if config.run_convert && already_processed(&config.output_dir, &stem) {
        info!(name = %record.name, "already processed, skipping");
        record.skipped = true;
        record.convert_ok = true;
        return record;
    }

    if config.run_convert && !config.dry_run {
        let doc_output = config.output_dir.join(&stem);
        match config.converter.run(path, &doc_output) {
            Ok(()) => record.convert_ok = true,
            Err(e) => {
                warn!(name = %record.name, "conversion failed: {e}");
                record.error = e.to_string();
                return record;
            }
        }
    } else {
        // Repair-only mode, or a dry run that would have converted.
        record.convert_ok = true;
    }

    let outputs = find_outputs(&config.output_dir, &stem);
    let Some(text_path) = outputs.text else {
        record.error = "converted text not found".to_string();
        return record;
    };

    if config.run_repair {
        let Some(tables_path) = outputs.tables else {
            record.error = "page tables artifact not found".to_string();
            return record;
        };
        let pipeline_config = PipelineConfig {
            tables_path,
            text_path,
            meta_path: outputs.meta,
            index_path: None,
            format: config.format,
            dry_run: config.dry_run,
            verbose: false,
        };
        match run_pipeline(&pipeline_config) {
            Ok(result) => {
                record.pipeline_ok = true;
                record.tables_total = result.total_tables;
                record.tables_fixed = result.fixed_tables;
            }
            Err(e) => {
                warn!(name = %record.name, "pipeline failed: {e}");
                record.error = e.to_string();
            }
        }
    } else {
        record.pipeline_ok = true;
    }

    record
}
