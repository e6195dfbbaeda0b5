use thiserror::Error;

use crate::models::ReportType;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Unsupported MIME type: {0}")]
    UnsupportedMimeType(String),

    #[error("Could not detect report type. Pass --type to choose one.")]
    TypeUndetectable,

    #[error("Parser not implemented for report type: {0}")]
    ParserNotImplemented(ReportType),

    #[error("Unknown report type: {0}")]
    UnknownReportType(String),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Unknown import: {0}")]
    UnknownImport(i64),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, ImportError>;
