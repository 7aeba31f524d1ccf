use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Find, diagnose, and repair broken tables in machine-converted documents.
#[derive(Debug, Parser)]
#[command(name = "tablemend", about, version)]
pub struct Cli {
    /// Only log errors
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List table regions in a converted text document
    Scan {
        /// Path to the converted text document
        #[arg(value_name = "TEXT")]
        text: PathBuf,

        /// Also judge each table's structural quality
        #[arg(long)]
        judge: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Build the table-to-page index and save it as JSON
    Index {
        /// Path to the conversion metadata document
        #[arg(value_name = "META", required_unless_present = "from_source")]
        meta: Option<PathBuf>,

        /// Build by scanning a page-tables artifact instead (slow fallback)
        #[arg(long, value_name = "TABLES", conflicts_with = "meta")]
        from_source: Option<PathBuf>,

        /// Where to write the index (default: next to the input)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Re-extract one table from a page-tables artifact
    Extract {
        /// Path to the page-tables artifact
        #[arg(value_name = "TABLES")]
        tables: PathBuf,

        /// Page or inclusive page range, e.g. '245' or '245-247'
        #[arg(long)]
        pages: String,

        /// Table identifier for labeling, e.g. 'Table 9.10.14.4'
        #[arg(long, default_value = "")]
        id: String,

        /// Output format for the extracted table
        #[arg(long, value_enum, default_value_t = FormatArg::Markdown)]
        format: FormatArg,
    },

    /// Run the repair pipeline over one converted document
    Fix {
        /// Path to the page-tables artifact
        #[arg(value_name = "TABLES")]
        tables: PathBuf,

        /// Path to the converted text document
        #[arg(value_name = "TEXT")]
        text: PathBuf,

        /// Conversion metadata document for page lookup
        #[arg(long)]
        meta: Option<PathBuf>,

        /// Precomputed index file (preferred over --meta)
        #[arg(long)]
        index: Option<PathBuf>,

        /// Output format for regenerated tables
        #[arg(long, value_enum, default_value_t = FormatArg::Markdown)]
        format: FormatArg,

        /// Diagnose and extract but do not modify any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Replace one table's region with content from a file
    Inject {
        /// Path to the converted text document
        #[arg(value_name = "TEXT")]
        text: PathBuf,

        /// Table identifier, e.g. 'Table 9.10.14.4'
        #[arg(value_name = "TABLE_ID")]
        table_id: String,

        /// File holding the replacement content
        #[arg(value_name = "CONTENT")]
        content: PathBuf,

        /// Show a before/after comparison instead of writing
        #[arg(long)]
        preview: bool,

        /// Skip the .bak backup before mutation
        #[arg(long)]
        no_backup: bool,
    },

    /// Convert and repair every document in a source directory
    Batch {
        /// Which stages to run
        #[arg(long, value_enum, default_value_t = BatchMode::All)]
        mode: BatchMode,

        /// Directory of raw source documents
        #[arg(long, default_value = "sources")]
        sources: PathBuf,

        /// Directory for conversion outputs
        #[arg(long, default_value = "converted")]
        output: PathBuf,

        /// Converter executable name or path
        #[arg(long)]
        converter: Option<String>,

        /// Conversion timeout in seconds (default: 3 hours)
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Diagnose only; run no converter and modify nothing
        #[arg(long)]
        dry_run: bool,

        /// Write the per-document report to this JSON file
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// One JSON document
    Json,
}

/// Table output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Pipe-delimited markdown table
    Markdown,
    /// Tagged thead/tbody block
    Html,
}

/// Batch stage selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BatchMode {
    /// Conversion and repair
    All,
    /// Conversion only
    Convert,
    /// Repair only
    Repair,
}

impl From<FormatArg> for tablemend::TableFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Markdown => tablemend::TableFormat::Markdown,
            FormatArg::Html => tablemend::TableFormat::Html,
        }
    }
}
