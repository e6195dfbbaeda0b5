use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::error::{ImportError, Result};

pub const DB_FILE: &str = "qbimport.db";

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS financial_imports (
    id INTEGER PRIMARY KEY,
    report_type TEXT NOT NULL,
    period TEXT,
    period_start TEXT,
    period_end TEXT,
    file_name TEXT NOT NULL,
    mime_type TEXT NOT NULL,
    file_size INTEGER NOT NULL,
    checksum TEXT NOT NULL UNIQUE,
    row_count INTEGER NOT NULL,
    skipped_rows INTEGER DEFAULT 0,
    parsed TEXT NOT NULL,
    summary TEXT NOT NULL,
    imported_at TEXT DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_financial_imports_type_period
    ON financial_imports (report_type, period);
";

/// One stored import. `parsed` and `summary` hold the JSON written by the
/// parser, unchanged.
#[derive(Debug, Clone)]
pub struct ImportRecord {
    pub id: i64,
    pub report_type: String,
    pub period: Option<String>,
    pub period_start: Option<String>,
    pub period_end: Option<String>,
    pub file_name: String,
    pub mime_type: String,
    pub file_size: i64,
    pub checksum: String,
    pub row_count: i64,
    pub skipped_rows: i64,
    pub parsed: String,
    pub summary: String,
    pub imported_at: String,
}

const SELECT_COLUMNS: &str = "id, report_type, period, period_start, period_end, file_name, \
     mime_type, file_size, checksum, row_count, skipped_rows, parsed, summary, imported_at";

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ImportRecord> {
    Ok(ImportRecord {
        id: row.get(0)?,
        report_type: row.get(1)?,
        period: row.get(2)?,
        period_start: row.get(3)?,
        period_end: row.get(4)?,
        file_name: row.get(5)?,
        mime_type: row.get(6)?,
        file_size: row.get(7)?,
        checksum: row.get(8)?,
        row_count: row.get(9)?,
        skipped_rows: row.get(10)?,
        parsed: row.get(11)?,
        summary: row.get(12)?,
        imported_at: row.get(13)?,
    })
}

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

pub fn insert_import(conn: &Connection, record: &ImportRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO financial_imports (report_type, period, period_start, period_end, file_name, \
         mime_type, file_size, checksum, row_count, skipped_rows, parsed, summary) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        rusqlite::params![
            record.report_type,
            record.period,
            record.period_start,
            record.period_end,
            record.file_name,
            record.mime_type,
            record.file_size,
            record.checksum,
            record.row_count,
            record.skipped_rows,
            record.parsed,
            record.summary,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_by_checksum(conn: &Connection, checksum: &str) -> Result<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM financial_imports WHERE checksum = ?1",
            [checksum],
            |r| r.get(0),
        )
        .optional()?;
    Ok(id)
}

pub fn list_imports(conn: &Connection, report_type: Option<&str>) -> Result<Vec<ImportRecord>> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM financial_imports \
         WHERE ?1 IS NULL OR report_type = ?1 \
         ORDER BY period_start DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([report_type], record_from_row)?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

pub fn get_import(conn: &Connection, id: i64) -> Result<ImportRecord> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM financial_imports WHERE id = ?1");
    conn.query_row(&sql, [id], record_from_row)
        .optional()?
        .ok_or(ImportError::UnknownImport(id))
}

pub fn delete_import(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM financial_imports WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(ImportError::UnknownImport(id));
    }
    Ok(())
}

pub fn count_imports(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT count(*) FROM financial_imports", [], |r| r.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn record(checksum: &str, report_type: &str, period_start: &str) -> ImportRecord {
        ImportRecord {
            id: 0,
            report_type: report_type.to_string(),
            period: Some(period_start[..7].to_string()),
            period_start: Some(period_start.to_string()),
            period_end: None,
            file_name: "pnl.csv".to_string(),
            mime_type: "text/csv".to_string(),
            file_size: 120,
            checksum: checksum.to_string(),
            row_count: 3,
            skipped_rows: 0,
            parsed: "[]".to_string(),
            summary: "{}".to_string(),
            imported_at: String::new(),
        }
    }

    #[test]
    fn test_init_db_creates_table() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(tables, vec!["financial_imports".to_string()]);
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
    }

    #[test]
    fn test_insert_and_get() {
        let (_dir, conn) = test_db();
        let id = insert_import(&conn, &record("abc", "profit_loss", "2025-01-01")).unwrap();
        let got = get_import(&conn, id).unwrap();
        assert_eq!(got.report_type, "profit_loss");
        assert_eq!(got.period.as_deref(), Some("2025-01"));
        assert_eq!(got.row_count, 3);
        assert!(!got.imported_at.is_empty());
    }

    #[test]
    fn test_checksum_is_unique() {
        let (_dir, conn) = test_db();
        insert_import(&conn, &record("abc", "profit_loss", "2025-01-01")).unwrap();
        assert!(insert_import(&conn, &record("abc", "profit_loss", "2025-01-01")).is_err());
        assert!(find_by_checksum(&conn, "abc").unwrap().is_some());
        assert!(find_by_checksum(&conn, "zzz").unwrap().is_none());
    }

    #[test]
    fn test_list_imports_filters_and_orders() {
        let (_dir, conn) = test_db();
        insert_import(&conn, &record("a", "profit_loss", "2025-01-01")).unwrap();
        insert_import(&conn, &record("b", "balance_sheet", "2025-02-01")).unwrap();
        insert_import(&conn, &record("c", "profit_loss", "2025-03-01")).unwrap();
        let all = list_imports(&conn, None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].checksum, "c");
        let pnl = list_imports(&conn, Some("profit_loss")).unwrap();
        assert_eq!(pnl.len(), 2);
        assert!(pnl.iter().all(|r| r.report_type == "profit_loss"));
    }

    #[test]
    fn test_delete_import() {
        let (_dir, conn) = test_db();
        let id = insert_import(&conn, &record("a", "profit_loss", "2025-01-01")).unwrap();
        delete_import(&conn, id).unwrap();
        assert_eq!(count_imports(&conn).unwrap(), 0);
        assert!(matches!(delete_import(&conn, id), Err(ImportError::UnknownImport(_))));
        assert!(matches!(get_import(&conn, id), Err(ImportError::UnknownImport(_))));
    }
}
