use comfy_table::{Cell, Table};

use crate::cli::summary::print_summary;
use crate::db::{delete_import, get_connection, get_import, list_imports};
use crate::error::Result;
use crate::models::{get_by_key, ReportType};
use crate::settings::{db_path, load_settings};

fn type_name(key: &str) -> String {
    get_by_key(key).map_or_else(|| key.to_string(), |t| t.name().to_string())
}

pub fn list(report_type: Option<&str>) -> Result<()> {
    let filter = report_type.map(str::parse::<ReportType>).transpose()?;
    let conn = get_connection(&db_path()?)?;
    let records = list_imports(&conn, filter.as_ref().map(ReportType::key))?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Type", "Period", "File", "Rows", "Imported"]);
    for r in &records {
        table.add_row(vec![
            Cell::new(r.id),
            Cell::new(type_name(&r.report_type)),
            Cell::new(r.period.as_deref().unwrap_or("")),
            Cell::new(&r.file_name),
            Cell::new(r.row_count),
            Cell::new(&r.imported_at),
        ]);
    }
    println!("Imports\n{table}");
    Ok(())
}

pub fn show(id: i64, json: bool) -> Result<()> {
    let conn = get_connection(&db_path()?)?;
    let r = get_import(&conn, id)?;
    let parsed: serde_json::Value = serde_json::from_str(&r.parsed)?;
    let summary: serde_json::Value = serde_json::from_str(&r.summary)?;

    if json {
        let record = serde_json::json!({
            "type": r.report_type,
            "period": r.period,
            "periodStart": r.period_start,
            "periodEnd": r.period_end,
            "file_metadata": {
                "fileName": r.file_name,
                "mimeType": r.mime_type,
                "fileSize": r.file_size,
                "checksum": r.checksum,
                "skippedRows": r.skipped_rows,
                "importedAt": r.imported_at,
            },
            "parsed": parsed,
            "summary": summary,
        });
        let out = if load_settings().pretty_json {
            serde_json::to_string_pretty(&record)?
        } else {
            serde_json::to_string(&record)?
        };
        println!("{out}");
        return Ok(());
    }

    let company = load_settings().company_name;
    if !company.is_empty() {
        println!("{company}");
    }
    println!("Import #{}: {}", r.id, type_name(&r.report_type));
    match (&r.period, &r.period_start, &r.period_end) {
        (Some(p), Some(start), Some(end)) => println!("Period:   {p} ({start} to {end})"),
        (Some(p), _, _) => println!("Period:   {p}"),
        _ => println!("Period:   (none)"),
    }
    println!("File:     {} ({} bytes)", r.file_name, r.file_size);
    println!("Rows:     {} parsed, {} skipped", r.row_count, r.skipped_rows);
    println!();
    print_summary("Summary", &summary);
    Ok(())
}

pub fn delete(id: i64) -> Result<()> {
    let conn = get_connection(&db_path()?)?;
    delete_import(&conn, id)?;
    println!("Deleted import #{id}");
    Ok(())
}
