use std::sync::OnceLock;

use regex::Regex;

use crate::models::ReportType;
use crate::sheet::{row_text, RawSheet};

/// Rows inspected for the report title and period.
pub const HEADER_ROWS: usize = 10;

/// Rows inspected for the column-header row.
const DATA_START_SCAN_ROWS: usize = 15;

/// Typical QuickBooks export header height.
const DEFAULT_DATA_START: usize = 5;

const DATA_START_KEYWORDS: &[&str] = &["account", "total", "amount", "debit", "credit", "balance"];

// First match wins. The broad P&L pattern precedes the by-class and
// by-location patterns, so titled by-class/by-location exports classify as
// plain P&L unless the caller passes the type explicitly.
const PATTERNS: &[(ReportType, &str)] = &[
    (ReportType::ProfitLoss, r"profit\s*(and|&)\s*loss|income\s+statement|\bp\s*&\s*l\b"),
    (ReportType::ProfitLossByClass, r"profit\s*(and|&)\s*loss\s+by\s+class"),
    (ReportType::ProfitLossByLocation, r"profit\s*(and|&)\s*loss\s+by\s+(location|department)"),
    (ReportType::BalanceSheet, r"balance\s+sheet|statement\s+of\s+financial\s+position"),
    (ReportType::CashFlowStatement, r"statement\s+of\s+cash\s+flows?|cash\s+flows?\s+statement"),
    (ReportType::ArAgingSummary, r"\ba/?r\s+aging|accounts\s+receivable\s+aging|receivables?\s+aging"),
    (ReportType::ApAgingSummary, r"\ba/?p\s+aging|accounts\s+payable\s+aging|payables?\s+aging"),
    (ReportType::SalesByProduct, r"sales\s+by\s+(product|item)"),
    (ReportType::ExpensesByVendor, r"expenses?\s+by\s+vendor"),
    (ReportType::PayrollSummary, r"payroll\s+summary"),
];

fn patterns() -> &'static [(ReportType, Regex)] {
    static COMPILED: OnceLock<Vec<(ReportType, Regex)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        PATTERNS
            .iter()
            .filter_map(|(kind, pat)| Regex::new(&format!("(?i){pat}")).ok().map(|re| (*kind, re)))
            .collect()
    })
}

pub fn detect_report_type(sheet: &RawSheet) -> Option<ReportType> {
    let text = sheet.header_text(HEADER_ROWS);
    let found = patterns()
        .iter()
        .find(|(_, re)| re.is_match(&text))
        .map(|(kind, _)| *kind);
    match found {
        Some(kind) => log::debug!("detected report type {kind}"),
        None => log::debug!("no report title matched in first {HEADER_ROWS} rows"),
    }
    found
}

/// Index of the first data row: the row after the first header-like row in
/// the scan window, else the fixed fallback.
pub fn find_data_start(sheet: &RawSheet) -> usize {
    for (i, row) in sheet.rows().iter().take(DATA_START_SCAN_ROWS).enumerate() {
        let text = row_text(row);
        if DATA_START_KEYWORDS.iter().any(|k| text.contains(k)) {
            log::debug!("column header at row {i}; data starts at row {}", i + 1);
            return i + 1;
        }
    }
    log::debug!("no column header found; data starts at row {DEFAULT_DATA_START}");
    DEFAULT_DATA_START
}
