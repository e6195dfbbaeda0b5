use std::path::Path;

use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::db::{find_by_checksum, insert_import, ImportRecord};
use crate::detector::{detect_report_type, find_data_start};
use crate::error::{ImportError, Result};
use crate::models::{ParseResult, ReportType};
use crate::period::extract_period;
use crate::sheet::read_sheet;

// ---------------------------------------------------------------------------
// parse_report
// ---------------------------------------------------------------------------

/// Parse one exported report. Either the whole result or a named error; no
/// partial output.
pub fn parse_report(bytes: &[u8], mime_type: &str, report_type: Option<&str>) -> Result<ParseResult> {
    let sheet = read_sheet(bytes, mime_type)?;
    if sheet.is_empty() {
        log::warn!("sheet has no rows");
    }

    // A blank override means "detect".
    let kind = match report_type.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => key.parse::<ReportType>()?,
        None => detect_report_type(&sheet).ok_or(ImportError::TypeUndetectable)?,
    };
    let period = extract_period(&sheet);
    let data_start = find_data_start(&sheet);
    let report = kind.parse(&sheet, data_start)?;

    if report.skipped_rows > 0 {
        log::warn!("{kind}: {} unlabelled rows skipped", report.skipped_rows);
    }
    log::info!("{kind}: {} rows parsed from {} sheet rows", report.parsed.len(), sheet.len());

    Ok(ParseResult {
        report_type: kind,
        period,
        parsed: report.parsed,
        summary: report.summary,
        data_start,
        skipped_rows: report.skipped_rows,
    })
}

/// Guess a MIME type from the file extension.
pub fn mime_for_path(file_path: &Path) -> String {
    mime_guess::from_path(file_path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

pub fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// import_file
// ---------------------------------------------------------------------------

pub struct ImportResult {
    pub id: Option<i64>,
    pub duplicate_file: bool,
    pub result: Option<ParseResult>,
}

pub fn import_file(
    conn: &Connection,
    file_path: &Path,
    mime_type: Option<&str>,
    report_type: Option<&str>,
) -> Result<ImportResult> {
    let bytes = std::fs::read(file_path)?;
    let sum = checksum(&bytes);
    if let Some(id) = find_by_checksum(conn, &sum)? {
        return Ok(ImportResult {
            id: Some(id),
            duplicate_file: true,
            result: None,
        });
    }

    let mime = mime_type
        .map(str::to_string)
        .unwrap_or_else(|| mime_for_path(file_path));
    let result = parse_report(&bytes, &mime, report_type)?;

    let record = ImportRecord {
        id: 0,
        report_type: result.report_type.key().to_string(),
        period: result.period.period.clone(),
        period_start: result.period.period_start.map(|d| d.to_string()),
        period_end: result.period.period_end.map(|d| d.to_string()),
        file_name: file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string(),
        mime_type: mime,
        file_size: bytes.len() as i64,
        checksum: sum,
        row_count: result.parsed.len() as i64,
        skipped_rows: result.skipped_rows as i64,
        parsed: serde_json::to_string(&result.parsed)?,
        summary: serde_json::to_string(&result.summary)?,
        imported_at: String::new(),
    };
    let id = insert_import(conn, &record)?;

    Ok(ImportResult {
        id: Some(id),
        duplicate_file: false,
        result: Some(result),
    })
}
