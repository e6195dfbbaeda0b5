use std::path::PathBuf;

use crate::cli::summary::print_summary;
use crate::db::get_connection;
use crate::error::Result;
use crate::importer::import_file;
use crate::settings::db_path;

pub fn run(file: &str, mime: Option<&str>, report_type: Option<&str>) -> Result<()> {
    let file_path = PathBuf::from(file);
    let conn = get_connection(&db_path()?)?;

    let imported = import_file(&conn, &file_path, mime, report_type)?;
    let id = imported.id.unwrap_or_default();

    if imported.duplicate_file {
        println!("This file has already been imported (import #{id}).");
        return Ok(());
    }
    let Some(result) = imported.result else {
        return Ok(());
    };

    let period = result.period.period.as_deref().unwrap_or("no period");
    print!(
        "Imported #{id}: {}, {period}, {} rows",
        result.report_type.name(),
        result.parsed.len()
    );
    if result.skipped_rows > 0 {
        print!(" ({} skipped)", result.skipped_rows);
    }
    println!();

    let summary = serde_json::to_value(&result.summary)?;
    print_summary("Summary", &summary);
    Ok(())
}
