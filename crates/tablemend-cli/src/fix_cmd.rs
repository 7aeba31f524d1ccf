use std::path::{Path, PathBuf};

use tablemend::{PipelineConfig, run_pipeline};

use crate::cli::FormatArg;
use crate::shared::fail;

pub fn run(
    tables: &Path,
    text: &Path,
    meta: Option<PathBuf>,
    index: Option<PathBuf>,
    format: &FormatArg,
    dry_run: bool,
) -> Result<(), i32> {
    let config = PipelineConfig {
        tables_path: tables.to_path_buf(),
        text_path: text.to_path_buf(),
        meta_path: meta,
        index_path: index,
        format: (*format).into(),
        dry_run,
        verbose: true,
    };

    let result = run_pipeline(&config).map_err(fail)?;

    println!("{}", result.summary());
    let failures: Vec<&str> = result.failures().collect();
    if !failures.is_empty() {
        println!();
        println!("Failed tables:");
        for failure in failures {
            println!("  {failure}");
        }
    }

    // A run with failed tables still exits 0: per-table failures are
    // reported outcomes, not tool errors.
    Ok(())
}
