use std::collections::BTreeMap;

use crate::amount::cell_amount;
use crate::error::{ImportError, Result};
use crate::models::{
    AgingRow, AgingSummary, BalanceCategory, BalanceRow, BalanceSummary, ClassRow, ClassSummary,
    ClassTotals, ParsedReport, ParsedRow, PnlCategory, PnlRow, PnlSummary, ProductRow,
    ProductSummary, ReportType, Summary, VendorRow, VendorSummary,
};
use crate::sheet::{Cell, RawSheet};

// ---------------------------------------------------------------------------
// Row walking
// ---------------------------------------------------------------------------

struct DataRow<'a> {
    label: String,
    lower: String,
    cells: &'a [Cell],
}

impl DataRow<'_> {
    fn cell(&self, idx: usize) -> Option<&Cell> {
        self.cells.get(idx).filter(|c| !c.is_blank())
    }

    fn amount(&self, idx: usize) -> f64 {
        cell_amount(self.cell(idx))
    }

    /// Section headings carry a label and nothing else. They are still
    /// emitted, with a zero amount.
    fn has_values(&self) -> bool {
        self.cells.iter().skip(1).any(|c| !c.is_blank())
    }

    /// The right-most populated column, which is the "Total" column on
    /// multi-column exports.
    fn last_amount(&self) -> f64 {
        let idx = self
            .cells
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .find(|(_, c)| !c.is_blank())
            .map(|(i, _)| i);
        idx.map_or(0.0, |i| self.amount(i))
    }

    fn is_total(&self) -> bool {
        self.lower.contains("total")
    }
}

/// Labelled rows from `start` on. Rows with values but no label are counted
/// in `skipped`; fully blank rows are layout and ignored.
fn data_rows<'a>(sheet: &'a RawSheet, start: usize, skipped: &mut usize) -> Vec<DataRow<'a>> {
    let mut out = Vec::new();
    for (i, cells) in sheet.rows().iter().enumerate().skip(start) {
        let label = cells
            .first()
            .map(|c| c.text().trim().to_string())
            .unwrap_or_default();
        if label.is_empty() {
            if cells.iter().any(|c| !c.is_blank()) {
                log::warn!("row {}: values without a label, skipped", i + 1);
                *skipped += 1;
            }
            continue;
        }
        let lower = label.to_lowercase();
        out.push(DataRow { label, lower, cells });
    }
    out
}

impl ReportType {
    /// Walk the data rows of `sheet` with this type's row parser.
    pub fn parse(&self, sheet: &RawSheet, start: usize) -> Result<ParsedReport> {
        let mut skipped = 0usize;
        let rows = data_rows(sheet, start, &mut skipped);
        let (parsed, summary) = match self {
            Self::ProfitLoss => parse_profit_loss(&rows),
            Self::ProfitLossByClass => parse_profit_loss_by_class(sheet, start, &rows),
            Self::BalanceSheet => parse_balance_sheet(&rows),
            Self::ArAgingSummary => parse_ar_aging(&rows),
            Self::SalesByProduct => parse_sales_by_product(&rows),
            Self::ExpensesByVendor => parse_expenses_by_vendor(&rows),
            Self::ProfitLossByLocation
            | Self::CashFlowStatement
            | Self::ApAgingSummary
            | Self::PayrollSummary => return Err(ImportError::ParserNotImplemented(*self)),
        };
        Ok(ParsedReport {
            parsed,
            summary,
            skipped_rows: skipped,
        })
    }
}

fn pct(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

// ---------------------------------------------------------------------------
// Profit & Loss
// ---------------------------------------------------------------------------

// Lines QuickBooks computes from other lines.
const COMPUTED_LINES: &[&str] = &["gross profit", "net income", "net operating income", "net other income"];

fn is_computed_line(lower: &str) -> bool {
    COMPUTED_LINES.iter().any(|k| lower.starts_with(k))
}

pub fn pnl_category(lower: &str) -> PnlCategory {
    if ["income", "revenue", "sales"].iter().any(|k| lower.contains(k)) {
        PnlCategory::Income
    } else if lower.contains("cost of goods") || lower.contains("cogs") {
        PnlCategory::Cogs
    } else if lower.contains("expense") || lower.contains("operating") {
        PnlCategory::Expense
    } else {
        PnlCategory::Other
    }
}

fn parse_profit_loss(rows: &[DataRow<'_>]) -> (Vec<ParsedRow>, Summary) {
    let mut parsed = Vec::new();
    let mut s = PnlSummary::default();
    let mut reported_net = None;

    for row in rows {
        let amount = row.last_amount();
        if row.lower.starts_with("net income") && row.has_values() {
            reported_net = Some(amount);
        }
        if row.is_total() || is_computed_line(&row.lower) {
            continue;
        }
        let category = pnl_category(&row.lower);
        match category {
            PnlCategory::Income => s.total_income += amount,
            PnlCategory::Cogs => s.total_cogs += amount,
            PnlCategory::Expense => s.total_expenses += amount,
            PnlCategory::Other => {}
        }
        parsed.push(ParsedRow::Pnl(PnlRow {
            account: row.label.clone(),
            amount,
            category,
        }));
    }

    s.gross_profit = s.total_income - s.total_cogs;
    s.gross_margin_pct = pct(s.gross_profit, s.total_income);
    s.net_income = s.gross_profit - s.total_expenses;

    if let Some(reported) = reported_net {
        if (reported - s.net_income).abs() > 0.005 {
            log::warn!(
                "reported net income {reported:.2} differs from computed {:.2}",
                s.net_income
            );
        }
    }
    (parsed, Summary::Pnl(s))
}

// ---------------------------------------------------------------------------
// Profit & Loss by Class
// ---------------------------------------------------------------------------

fn class_columns(sheet: &RawSheet, start: usize) -> Vec<(usize, String)> {
    let Some(header) = start.checked_sub(1).and_then(|i| sheet.row(i)) else {
        return Vec::new();
    };
    header
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(i, c)| {
            let name = c.text().trim().to_string();
            if name.is_empty() || name.to_lowercase().contains("total") {
                None
            } else {
                Some((i, name))
            }
        })
        .collect()
}

fn parse_profit_loss_by_class(
    sheet: &RawSheet,
    start: usize,
    rows: &[DataRow<'_>],
) -> (Vec<ParsedRow>, Summary) {
    let classes = class_columns(sheet, start);
    if classes.is_empty() {
        log::warn!("no class columns found in header row {start}");
    }
    let mut by_class: BTreeMap<String, ClassTotals> = classes
        .iter()
        .map(|(_, name)| (name.clone(), ClassTotals::default()))
        .collect();
    let mut parsed = Vec::new();

    for row in rows {
        if row.is_total() || is_computed_line(&row.lower) {
            continue;
        }
        let category = pnl_category(&row.lower);
        for (idx, class) in &classes {
            let amount = row.amount(*idx);
            if let Some(totals) = by_class.get_mut(class) {
                match category {
                    PnlCategory::Income => totals.revenue += amount,
                    PnlCategory::Cogs | PnlCategory::Expense => totals.expenses += amount,
                    PnlCategory::Other => {}
                }
            }
            parsed.push(ParsedRow::Class(ClassRow {
                account: row.label.clone(),
                class: class.clone(),
                amount,
            }));
        }
    }

    for totals in by_class.values_mut() {
        totals.margin = totals.revenue - totals.expenses;
        totals.margin_pct = pct(totals.margin, totals.revenue);
    }
    (parsed, Summary::Class(ClassSummary { by_class }))
}

// ---------------------------------------------------------------------------
// Balance Sheet
// ---------------------------------------------------------------------------

fn balance_keyword(lower: &str) -> Option<BalanceCategory> {
    if lower.contains("liabilit") || lower.contains("payable") {
        Some(BalanceCategory::Liability)
    } else if lower.contains("equity") || lower.contains("retained earnings") {
        Some(BalanceCategory::Equity)
    } else if lower.contains("asset") {
        Some(BalanceCategory::Asset)
    } else {
        None
    }
}

fn parse_balance_sheet(rows: &[DataRow<'_>]) -> (Vec<ParsedRow>, Summary) {
    let mut parsed = Vec::new();
    let mut s = BalanceSummary::default();
    let (mut assets, mut liabilities, mut equity) = (0.0, 0.0, 0.0);
    let (mut named_assets, mut named_liabilities, mut named_equity) = (None, None, None);
    let mut section = BalanceCategory::Other;

    for row in rows {
        let heading = !row.has_values();
        if heading {
            if let Some(cat) = balance_keyword(&row.lower) {
                section = cat;
            }
        }
        let amount = row.last_amount();
        match row.lower.as_str() {
            _ if heading => {}
            "total assets" => named_assets = Some(amount),
            "total liabilities" => named_liabilities = Some(amount),
            "total equity" => named_equity = Some(amount),
            _ => {}
        }
        if row.is_total() {
            continue;
        }

        let category = balance_keyword(&row.lower).unwrap_or(section);
        match category {
            BalanceCategory::Asset => assets += amount,
            BalanceCategory::Liability => liabilities += amount,
            BalanceCategory::Equity => equity += amount,
            BalanceCategory::Other => {}
        }
        if row.lower.contains("cash") {
            s.cash += amount;
        }
        if row.lower.contains("accounts receivable") || row.lower.contains("a/r") {
            s.accounts_receivable += amount;
        }
        if row.lower.contains("accounts payable") || row.lower.contains("a/p") {
            s.accounts_payable += amount;
        }
        parsed.push(ParsedRow::Balance(BalanceRow {
            account: row.label.clone(),
            amount,
            category,
        }));
    }

    s.total_assets = named_assets.unwrap_or(assets);
    s.total_liabilities = named_liabilities.unwrap_or(liabilities);
    s.total_equity = named_equity.unwrap_or(equity);
    (parsed, Summary::Balance(s))
}

// ---------------------------------------------------------------------------
// A/R Aging Summary
// ---------------------------------------------------------------------------

fn parse_ar_aging(rows: &[DataRow<'_>]) -> (Vec<ParsedRow>, Summary) {
    let mut parsed = Vec::new();
    let mut s = AgingSummary::default();

    // Columns: customer, current, 1-30, 31-60, 61-90, 91 and over, total.
    for row in rows.iter().filter(|r| !r.is_total()) {
        let aging = AgingRow {
            customer: row.label.clone(),
            current: row.amount(1),
            days1_30: row.amount(2),
            days31_60: row.amount(3),
            days61_90: row.amount(4),
            days_over_90: row.amount(5),
            total: row.amount(6),
        };
        s.total += aging.total;
        s.current += aging.current;
        s.days30 += aging.days1_30;
        s.days60 += aging.days31_60;
        s.days90 += aging.days61_90;
        s.days_over_90 += aging.days_over_90;
        parsed.push(ParsedRow::Aging(aging));
    }

    s.over_60_pct = if s.total > 0.0 {
        (s.days60 + s.days90 + s.days_over_90) / s.total * 100.0
    } else {
        0.0
    };
    (parsed, Summary::Aging(s))
}

// ---------------------------------------------------------------------------
// Sales by Product/Service
// ---------------------------------------------------------------------------

fn parse_sales_by_product(rows: &[DataRow<'_>]) -> (Vec<ParsedRow>, Summary) {
    let mut parsed = Vec::new();
    let mut total_revenue = 0.0;

    for row in rows.iter().filter(|r| !r.is_total()) {
        let amount = match row.cell(2) {
            Some(c) => cell_amount(Some(c)),
            None => row.amount(1),
        };
        total_revenue += amount;
        parsed.push(ParsedRow::Product(ProductRow {
            product: row.label.clone(),
            quantity: row.amount(1),
            amount,
        }));
    }

    let summary = ProductSummary {
        total_revenue,
        product_count: parsed.len(),
    };
    (parsed, Summary::Product(summary))
}

// ---------------------------------------------------------------------------
// Expenses by Vendor
// ---------------------------------------------------------------------------

fn parse_expenses_by_vendor(rows: &[DataRow<'_>]) -> (Vec<ParsedRow>, Summary) {
    let mut vendors: Vec<VendorRow> = rows
        .iter()
        .filter(|r| !r.is_total())
        .map(|row| {
            let amount = match row.cell(1) {
                Some(c) => cell_amount(Some(c)),
                None => row.amount(2),
            };
            VendorRow {
                vendor: row.label.clone(),
                amount,
            }
        })
        .collect();
    vendors.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    let summary = VendorSummary {
        total_expenses: vendors.iter().map(|v| v.amount).sum(),
        vendor_count: vendors.len(),
        top_vendors: vendors.iter().take(5).cloned().collect(),
    };
    let parsed = vendors.into_iter().map(ParsedRow::Vendor).collect();
    (parsed, Summary::Vendor(summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &[&[&str]]) -> RawSheet {
        RawSheet::new(
            rows.iter()
                .map(|r| r.iter().map(|c| Cell::from(*c)).collect())
                .collect(),
        )
    }

    fn pnl_summary(report: &ParsedReport) -> &PnlSummary {
        match &report.summary {
            Summary::Pnl(s) => s,
            other => panic!("expected P&L summary, got {other:?}"),
        }
    }

    #[test]
    fn test_profit_loss_summary() {
        let s = sheet(&[
            &["Account", "Total"],
            &["Income"],
            &["Sales Income", "1000"],
            &["Cost of Goods Sold", "400"],
            &["Rent Expense", "200"],
            &["Total Income", "1000"],
            &["Gross Profit", "600"],
            &["Net Income", "400"],
        ]);
        let report = ReportType::ProfitLoss.parse(&s, 1).unwrap();
        let sum = pnl_summary(&report);
        assert_eq!(sum.total_income, 1000.0);
        assert_eq!(sum.total_cogs, 400.0);
        assert_eq!(sum.gross_profit, 600.0);
        assert_eq!(sum.gross_margin_pct, 60.0);
        assert_eq!(sum.total_expenses, 200.0);
        assert_eq!(sum.net_income, 400.0);
        assert_eq!(report.parsed.len(), 4);
        assert!(report.parsed.iter().all(|r| match r {
            ParsedRow::Pnl(row) => !row.account.contains("Net Income"),
            _ => false,
        }));
    }

    #[test]
    fn test_profit_loss_arithmetic_invariants() {
        let s = sheet(&[
            &["Account", "Total"],
            &["Propane Sales", "$12,345.67"],
            &["Service Revenue", "2,000.10"],
            &["Cost of Goods Sold - Propane", "(7,000.33)"],
            &["Operating Expenses", "3,210.99"],
            &["Delivery Expense", "815.02"],
        ]);
        let report = ReportType::ProfitLoss.parse(&s, 1).unwrap();
        let sum = pnl_summary(&report);
        assert_eq!(sum.gross_profit, sum.total_income - sum.total_cogs);
        assert_eq!(sum.net_income, sum.gross_profit - sum.total_expenses);
    }

    #[test]
    fn test_profit_loss_zero_income_margin() {
        let s = sheet(&[&["Account", "Total"], &["Rent Expense", "200"]]);
        let report = ReportType::ProfitLoss.parse(&s, 1).unwrap();
        assert_eq!(pnl_summary(&report).gross_margin_pct, 0.0);
        assert_eq!(pnl_summary(&report).net_income, -200.0);
    }

    #[test]
    fn test_profit_loss_uses_total_column() {
        let s = sheet(&[
            &["Account", "Jan 2025", "Feb 2025", "Total"],
            &["Sales", "100", "150", "250"],
        ]);
        let report = ReportType::ProfitLoss.parse(&s, 1).unwrap();
        assert_eq!(pnl_summary(&report).total_income, 250.0);
    }

    #[test]
    fn test_pnl_category() {
        assert_eq!(pnl_category("sales income"), PnlCategory::Income);
        assert_eq!(pnl_category("service revenue"), PnlCategory::Income);
        assert_eq!(pnl_category("cost of goods sold"), PnlCategory::Cogs);
        assert_eq!(pnl_category("cogs - fuel"), PnlCategory::Cogs);
        assert_eq!(pnl_category("rent expense"), PnlCategory::Expense);
        assert_eq!(pnl_category("operating supplies"), PnlCategory::Expense);
        assert_eq!(pnl_category("depreciation"), PnlCategory::Other);
    }

    #[test]
    fn test_unlabelled_rows_are_counted_as_skipped() {
        let s = sheet(&[
            &["Account", "Total"],
            &["", "55"],
            &["", ""],
            &["Sales", "10"],
        ]);
        let report = ReportType::ProfitLoss.parse(&s, 1).unwrap();
        assert_eq!(report.skipped_rows, 1);
        assert_eq!(report.parsed.len(), 1);
    }

    #[test]
    fn test_labelled_rows_without_values_are_kept() {
        let s = sheet(&[
            &["Account", "Total"],
            &["Income"],
            &["Sales", "10"],
            &["Net Income"],
        ]);
        let report = ReportType::ProfitLoss.parse(&s, 1).unwrap();
        assert_eq!(report.skipped_rows, 0);
        assert_eq!(
            report.parsed[0],
            ParsedRow::Pnl(PnlRow {
                account: "Income".to_string(),
                amount: 0.0,
                category: PnlCategory::Income,
            })
        );
        assert_eq!(report.parsed.len(), 2);
        assert_eq!(pnl_summary(&report).net_income, 10.0);
    }

    #[test]
    fn test_vendor_without_amount_is_counted() {
        let s = sheet(&[
            &["Expenses by Vendor Summary"],
            &["Vendor", "Total"],
            &["Irving Oil", "300"],
            &["New Vendor", ""],
        ]);
        let report = ReportType::ExpensesByVendor.parse(&s, 2).unwrap();
        let Summary::Vendor(sum) = &report.summary else {
            panic!("expected vendor summary");
        };
        assert_eq!(sum.vendor_count, 2);
        assert_eq!(report.parsed.len(), 2);
        assert_eq!(
            report.parsed[1],
            ParsedRow::Vendor(VendorRow {
                vendor: "New Vendor".to_string(),
                amount: 0.0,
            })
        );
    }

    #[test]
    fn test_product_without_values_is_counted() {
        let s = sheet(&[&["", "Qty", "Amount"], &["Propane", "10", "25"], &["Gift Card"]]);
        let report = ReportType::SalesByProduct.parse(&s, 1).unwrap();
        let Summary::Product(sum) = &report.summary else {
            panic!("expected product summary");
        };
        assert_eq!(sum.product_count, 2);
        assert_eq!(sum.total_revenue, 25.0);
    }

    #[test]
    fn test_profit_loss_by_class() {
        let s = sheet(&[
            &["Profit and Loss by Class"],
            &["", "Propane", "Service", "Total"],
            &["Sales Income", "800", "200", "1000"],
            &["Cost of Goods Sold", "300", "0", "300"],
            &["Truck Expense", "100", "50", "150"],
            &["Total Income", "800", "200", "1000"],
        ]);
        let report = ReportType::ProfitLossByClass.parse(&s, 2).unwrap();
        assert_eq!(report.parsed.len(), 6);
        let Summary::Class(sum) = &report.summary else {
            panic!("expected class summary");
        };
        assert_eq!(sum.by_class.len(), 2);
        let propane = &sum.by_class["Propane"];
        assert_eq!(propane.revenue, 800.0);
        assert_eq!(propane.expenses, 400.0);
        assert_eq!(propane.margin, 400.0);
        assert_eq!(propane.margin_pct, 50.0);
        let service = &sum.by_class["Service"];
        assert_eq!(service.margin, 150.0);
        assert_eq!(service.margin_pct, 75.0);
        assert_eq!(
            report.parsed[1],
            ParsedRow::Class(ClassRow {
                account: "Sales Income".to_string(),
                class: "Service".to_string(),
                amount: 200.0,
            })
        );
    }

    #[test]
    fn test_balance_sheet() {
        let s = sheet(&[
            &["", "Total"],
            &["ASSETS"],
            &["Checking", "5000"],
            &["Petty Cash", "250"],
            &["Accounts Receivable (A/R)", "3000"],
            &["Total Current Assets", "8250"],
            &["Truck Fleet", "40000"],
            &["Total Assets", "48250"],
            &["LIABILITIES AND EQUITY"],
            &["Accounts Payable (A/P)", "1200"],
            &["Truck Loan", "20000"],
            &["Total Liabilities", "21200"],
            &["Equity"],
            &["Retained Earnings", "27050"],
            &["Total Equity", "27050"],
            &["Total Liabilities and Equity", "48250"],
        ]);
        let report = ReportType::BalanceSheet.parse(&s, 1).unwrap();
        let Summary::Balance(sum) = &report.summary else {
            panic!("expected balance summary");
        };
        assert_eq!(sum.total_assets, 48250.0);
        assert_eq!(sum.total_liabilities, 21200.0);
        assert_eq!(sum.total_equity, 27050.0);
        assert_eq!(sum.cash, 250.0);
        assert_eq!(sum.accounts_receivable, 3000.0);
        assert_eq!(sum.accounts_payable, 1200.0);
        assert_eq!(report.parsed.len(), 10);

        let category_of = |name: &str| {
            report.parsed.iter().find_map(|r| match r {
                ParsedRow::Balance(b) if b.account == name => Some(b.category),
                _ => None,
            })
        };
        assert_eq!(category_of("Checking"), Some(BalanceCategory::Asset));
        assert_eq!(category_of("Truck Loan"), Some(BalanceCategory::Liability));
        assert_eq!(category_of("Retained Earnings"), Some(BalanceCategory::Equity));
        assert_eq!(category_of("ASSETS"), Some(BalanceCategory::Asset));
    }

    #[test]
    fn test_balance_sheet_empty_total_line_is_not_captured() {
        let s = sheet(&[
            &["", "Total"],
            &["Assets"],
            &["Checking", "100"],
            &["Total Assets"],
        ]);
        let report = ReportType::BalanceSheet.parse(&s, 1).unwrap();
        let Summary::Balance(sum) = &report.summary else {
            panic!("expected balance summary");
        };
        assert_eq!(sum.total_assets, 100.0);
        assert_eq!(report.parsed.len(), 2);
    }

    #[test]
    fn test_balance_sheet_without_named_totals_sums_rows() {
        let s = sheet(&[
            &["", "Total"],
            &["Assets"],
            &["Checking", "100"],
            &["Fixed Assets", "50"],
            &["Liabilities"],
            &["Loan", "30"],
        ]);
        let report = ReportType::BalanceSheet.parse(&s, 1).unwrap();
        let Summary::Balance(sum) = &report.summary else {
            panic!("expected balance summary");
        };
        assert_eq!(sum.total_assets, 150.0);
        assert_eq!(sum.total_liabilities, 30.0);
        assert_eq!(sum.total_equity, 0.0);
    }

    #[test]
    fn test_ar_aging() {
        let s = sheet(&[
            &["", "Current", "1 - 30", "31 - 60", "61 - 90", "91 and over", "Total"],
            &["Acme Farms", "100", "50", "25", "15", "10", "200"],
            &["Hill Dairy", "200", "", "", "", "", "200"],
            &["TOTAL", "300", "50", "25", "15", "10", "400"],
        ]);
        let report = ReportType::ArAgingSummary.parse(&s, 1).unwrap();
        assert_eq!(report.parsed.len(), 2);
        let Summary::Aging(sum) = &report.summary else {
            panic!("expected aging summary");
        };
        assert_eq!(sum.total, 400.0);
        assert_eq!(sum.current, 300.0);
        assert_eq!(sum.days30, 50.0);
        assert_eq!(sum.days60, 25.0);
        assert_eq!(sum.days90, 15.0);
        assert_eq!(sum.days_over_90, 10.0);
        assert_eq!(sum.over_60_pct, (25.0 + 15.0 + 10.0) / 400.0 * 100.0);
    }

    #[test]
    fn test_ar_aging_zero_total_has_zero_pct() {
        let s = sheet(&[&["", "Current"], &["Acme Farms", "0", "0", "0", "0", "0", "0"]]);
        let report = ReportType::ArAgingSummary.parse(&s, 1).unwrap();
        let Summary::Aging(sum) = &report.summary else {
            panic!("expected aging summary");
        };
        assert_eq!(sum.over_60_pct, 0.0);
        assert!(!sum.over_60_pct.is_nan());
    }

    #[test]
    fn test_sales_by_product_amount_fallback() {
        let s = sheet(&[
            &["", "Qty", "Amount"],
            &["Propane (gal)", "500", "1,250.00"],
            &["Tank Rental", "300"],
            &["TOTAL", "800", "1550"],
        ]);
        let report = ReportType::SalesByProduct.parse(&s, 1).unwrap();
        let Summary::Product(sum) = &report.summary else {
            panic!("expected product summary");
        };
        assert_eq!(sum.product_count, 2);
        assert_eq!(sum.total_revenue, 1550.0);
        assert_eq!(
            report.parsed[1],
            ParsedRow::Product(ProductRow {
                product: "Tank Rental".to_string(),
                quantity: 300.0,
                amount: 300.0,
            })
        );
    }

    #[test]
    fn test_expenses_by_vendor_sorted_with_top_five() {
        let s = sheet(&[
            &["", "Total"],
            &["Irving Oil", "300"],
            &["Shell", "", "900"],
            &["Napa Auto", "50"],
            &["Verizon", "120"],
            &["Staples", "75"],
            &["Town Water", "20"],
            &["TOTAL", "1465"],
        ]);
        let report = ReportType::ExpensesByVendor.parse(&s, 1).unwrap();
        let Summary::Vendor(sum) = &report.summary else {
            panic!("expected vendor summary");
        };
        let amounts: Vec<f64> = report
            .parsed
            .iter()
            .map(|r| match r {
                ParsedRow::Vendor(v) => v.amount,
                _ => f64::NAN,
            })
            .collect();
        assert_eq!(amounts, vec![900.0, 300.0, 120.0, 75.0, 50.0, 20.0]);
        assert_eq!(sum.vendor_count, 6);
        assert_eq!(sum.total_expenses, 1465.0);
        let top: Vec<ParsedRow> = sum.top_vendors.iter().cloned().map(ParsedRow::Vendor).collect();
        assert_eq!(top.as_slice(), &report.parsed[..5]);
    }

    #[test]
    fn test_unimplemented_types_fail_by_name() {
        let s = sheet(&[&["Account", "Total"], &["Cash", "1"]]);
        for kind in [
            ReportType::ProfitLossByLocation,
            ReportType::CashFlowStatement,
            ReportType::ApAgingSummary,
            ReportType::PayrollSummary,
        ] {
            let err = kind.parse(&s, 1).unwrap_err();
            assert!(matches!(err, ImportError::ParserNotImplemented(k) if k == kind));
            assert!(!kind.has_parser());
        }
    }
}
