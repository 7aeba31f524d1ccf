use std::path::Path;
use std::time::Duration;

use tablemend::{BatchConfig, Converter, TableFormat, run_batch};

use crate::cli::BatchMode;
use crate::shared::fail;

pub fn run(
    mode: &BatchMode,
    sources: &Path,
    output: &Path,
    converter_program: Option<&str>,
    timeout_secs: Option<u64>,
    dry_run: bool,
    report_path: Option<&Path>,
) -> Result<(), i32> {
    let mut converter = Converter::default();
    if let Some(program) = converter_program {
        converter.program = program.to_string();
    }
    if let Some(secs) = timeout_secs {
        converter.timeout = Duration::from_secs(secs);
    }

    let config = BatchConfig {
        sources_dir: sources.to_path_buf(),
        output_dir: output.to_path_buf(),
        run_convert: matches!(mode, BatchMode::All | BatchMode::Convert),
        run_repair: matches!(mode, BatchMode::All | BatchMode::Repair),
        dry_run,
        converter,
        format: TableFormat::Markdown,
    };

    let report = run_batch(&config).map_err(fail)?;

    println!("{}", report.summary());
    let failures: Vec<String> = report
        .failures()
        .map(|record| format!("{}: {}", record.name, record.error))
        .collect();
    if !failures.is_empty() {
        println!();
        println!("Failed:");
        for failure in &failures {
            println!("  {failure}");
        }
    }

    if let Some(path) = report_path {
        report.save(path).map_err(fail)?;
        println!();
        println!("Report saved: {}", path.display());
    }

    Ok(())
}
