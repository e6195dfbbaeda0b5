use std::path::{Path, PathBuf};

use crate::detector::{detect_report_type, find_data_start};
use crate::error::Result;
use crate::importer::{mime_for_path, parse_report};
use crate::period::extract_period;
use crate::settings::load_settings;
use crate::sheet::read_sheet;

fn resolve_mime(file_path: &Path, mime: Option<String>) -> String {
    mime.unwrap_or_else(|| mime_for_path(file_path))
}

pub fn run(file: &str, mime: Option<String>, report_type: Option<&str>, compact: bool) -> Result<()> {
    let file_path = PathBuf::from(file);
    let bytes = std::fs::read(&file_path)?;
    let mime = resolve_mime(&file_path, mime);
    let result = parse_report(&bytes, &mime, report_type)?;

    let json = if compact || !load_settings().pretty_json {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{json}");
    if result.skipped_rows > 0 {
        eprintln!(
            "{} rows without a label were skipped (data starts at row {})",
            result.skipped_rows,
            result.data_start + 1
        );
    }
    Ok(())
}

pub fn detect(file: &str, mime: Option<String>) -> Result<()> {
    let file_path = PathBuf::from(file);
    let bytes = std::fs::read(&file_path)?;
    let mime = resolve_mime(&file_path, mime);
    let sheet = read_sheet(&bytes, &mime)?;

    let detected = detect_report_type(&sheet);
    let period = extract_period(&sheet);
    let data_start = find_data_start(&sheet);

    match detected {
        Some(t) => {
            let parser = if t.has_parser() { "" } else { " [no parser]" };
            println!("Type:        {} ({}){parser}", t.name(), t.key());
        }
        None => println!("Type:        (not detected)"),
    }
    match (&period.period, period.period_start, period.period_end) {
        (Some(p), Some(start), Some(end)) => println!("Period:      {p} ({start} to {end})"),
        (Some(p), _, _) => println!("Period:      {p}"),
        _ => println!("Period:      (not detected)"),
    }
    println!("Data starts: row {}", data_start + 1);
    println!("Rows:        {}", sheet.len());
    Ok(())
}
