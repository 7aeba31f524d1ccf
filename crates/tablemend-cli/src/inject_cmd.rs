use std::path::Path;

use tablemend::{inject_by_table_id, preview_injection};

use crate::shared::{fail, read_file};

pub fn run(
    text: &Path,
    table_id: &str,
    content_path: &Path,
    preview: bool,
    no_backup: bool,
) -> Result<(), i32> {
    let content = read_file(content_path)?;

    if preview {
        let comparison = preview_injection(text, table_id, &content).map_err(fail)?;
        println!("{comparison}");
        return Ok(());
    }

    let result = inject_by_table_id(text, table_id, &content, !no_backup);
    if result.success {
        println!("{}: OK - {}", result.table_id, result.message);
        Ok(())
    } else {
        eprintln!("{}: FAILED - {}", result.table_id, result.message);
        Err(1)
    }
}
