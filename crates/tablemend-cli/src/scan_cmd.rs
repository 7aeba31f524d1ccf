use std::path::Path;

use tablemend::{Scanner, TableLocation, judge_table};

use crate::cli::OutputFormat;
use crate::shared::read_file;

pub fn run(text_path: &Path, judge: bool, format: &OutputFormat) -> Result<(), i32> {
    let text = read_file(text_path)?;
    let locations = Scanner::new().scan(&text);

    match format {
        OutputFormat::Text => write_text(&locations, judge),
        OutputFormat::Json => write_json(&locations, judge),
    }

    Ok(())
}

fn write_text(locations: &[TableLocation], judge: bool) {
    println!("Found {} tables", locations.len());
    for location in locations {
        println!();
        println!("  {}", location.table_id);
        println!("    lines: {}-{}", location.start_line, location.end_line);
        if judge {
            let quality = judge_table(&location.content, &location.table_id);
            println!("    verdict: {}", quality.summary());
            for detail in &quality.details {
                println!("      {detail}");
            }
        }
    }
}

fn write_json(locations: &[TableLocation], judge: bool) {
    let entries: Vec<serde_json::Value> = locations
        .iter()
        .map(|location| {
            let mut entry = serde_json::json!({
                "table_id": location.table_id,
                "start_line": location.start_line,
                "end_line": location.end_line,
            });
            if judge {
                let quality = judge_table(&location.content, &location.table_id);
                entry["broken"] = serde_json::json!(quality.is_broken);
                entry["reasons"] = serde_json::json!(
                    quality
                        .reasons
                        .iter()
                        .map(|r| r.as_str())
                        .collect::<Vec<_>>()
                );
                entry["confidence"] = serde_json::json!(quality.confidence);
            }
            entry
        })
        .collect();

    println!(
        "{}",
        serde_json::to_string(&entries).expect("serializable scan output")
    );
}
