use std::path::{Path, PathBuf};

use tablemend::{IndexBuilder, JsonTableSource, TableIndex, load_meta};

use crate::shared::fail;

pub fn run(
    meta: Option<&Path>,
    from_source: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), i32> {
    let builder = IndexBuilder::new();

    let (index, input): (TableIndex, &Path) = match (meta, from_source) {
        (Some(meta_path), _) => {
            let meta = load_meta(meta_path).map_err(fail)?;
            (builder.build_from_meta(&meta), meta_path)
        }
        (None, Some(tables_path)) => {
            let source = JsonTableSource::load(tables_path).map_err(fail)?;
            (builder.build_from_source(&source), tables_path)
        }
        (None, None) => {
            // clap enforces one of the two; keep a guard for direct callers.
            eprintln!("Error: either META or --from-source is required");
            return Err(2);
        }
    };

    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => default_output(input),
    };
    index.save(&output_path).map_err(fail)?;

    println!(
        "Saved index with {} tables to {}",
        index.len(),
        output_path.display()
    );
    for (table_id, entry) in index.iter().take(5) {
        if entry.page_end > entry.page {
            println!("  {table_id}: pages {}-{}", entry.page, entry.page_end);
        } else {
            println!("  {table_id}: page {}", entry.page);
        }
    }

    Ok(())
}

/// `<input stem>_table_index.json` next to the input file.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "table".to_string());
    let name = format!("{}_table_index.json", stem.trim_end_matches("_meta"));
    input.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_strips_meta_suffix() {
        assert_eq!(
            default_output(Path::new("/out/nbc2025_meta.json")),
            PathBuf::from("/out/nbc2025_table_index.json")
        );
    }

    #[test]
    fn default_output_plain_stem() {
        assert_eq!(
            default_output(Path::new("doc_tables.json")),
            PathBuf::from("doc_tables_table_index.json")
        );
    }
}
