mod batch_cmd;
mod cli;
mod extract_cmd;
mod fix_cmd;
mod index_cmd;
mod inject_cmd;
mod page_span;
mod scan_cmd;
mod shared;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "error" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(default_level)
        }))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        cli::Commands::Scan {
            ref text,
            judge,
            ref format,
        } => scan_cmd::run(text, judge, format),
        cli::Commands::Index {
            ref meta,
            ref from_source,
            ref output,
        } => index_cmd::run(meta.as_deref(), from_source.as_deref(), output.as_deref()),
        cli::Commands::Extract {
            ref tables,
            ref pages,
            ref id,
            ref format,
        } => extract_cmd::run(tables, pages, id, format),
        cli::Commands::Fix {
            ref tables,
            ref text,
            ref meta,
            ref index,
            ref format,
            dry_run,
        } => fix_cmd::run(tables, text, meta.clone(), index.clone(), format, dry_run),
        cli::Commands::Inject {
            ref text,
            ref table_id,
            ref content,
            preview,
            no_backup,
        } => inject_cmd::run(text, table_id, content, preview, no_backup),
        cli::Commands::Batch {
            ref mode,
            ref sources,
            ref output,
            ref converter,
            timeout_secs,
            dry_run,
            ref report,
        } => batch_cmd::run(
            mode,
            sources,
            output,
            converter.as_deref(),
            timeout_secs,
            dry_run,
            report.as_deref(),
        ),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
