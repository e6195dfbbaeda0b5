use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ImportError;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    ProfitLoss,
    ProfitLossByClass,
    ProfitLossByLocation,
    BalanceSheet,
    CashFlowStatement,
    ArAgingSummary,
    ApAgingSummary,
    SalesByProduct,
    ExpensesByVendor,
    PayrollSummary,
}

pub const ALL_REPORT_TYPES: &[ReportType] = &[
    ReportType::ProfitLoss,
    ReportType::ProfitLossByClass,
    ReportType::ProfitLossByLocation,
    ReportType::BalanceSheet,
    ReportType::CashFlowStatement,
    ReportType::ArAgingSummary,
    ReportType::ApAgingSummary,
    ReportType::SalesByProduct,
    ReportType::ExpensesByVendor,
    ReportType::PayrollSummary,
];

impl ReportType {
    pub fn key(&self) -> &'static str {
        match self {
            Self::ProfitLoss => "profit_loss",
            Self::ProfitLossByClass => "profit_loss_by_class",
            Self::ProfitLossByLocation => "profit_loss_by_location",
            Self::BalanceSheet => "balance_sheet",
            Self::CashFlowStatement => "cash_flow_statement",
            Self::ArAgingSummary => "ar_aging_summary",
            Self::ApAgingSummary => "ap_aging_summary",
            Self::SalesByProduct => "sales_by_product",
            Self::ExpensesByVendor => "expenses_by_vendor",
            Self::PayrollSummary => "payroll_summary",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ProfitLoss => "Profit & Loss",
            Self::ProfitLossByClass => "Profit & Loss by Class",
            Self::ProfitLossByLocation => "Profit & Loss by Location",
            Self::BalanceSheet => "Balance Sheet",
            Self::CashFlowStatement => "Statement of Cash Flows",
            Self::ArAgingSummary => "A/R Aging Summary",
            Self::ApAgingSummary => "A/P Aging Summary",
            Self::SalesByProduct => "Sales by Product/Service",
            Self::ExpensesByVendor => "Expenses by Vendor",
            Self::PayrollSummary => "Payroll Summary",
        }
    }

    /// Whether a row parser exists. The rest are detectable only.
    pub fn has_parser(&self) -> bool {
        matches!(
            self,
            Self::ProfitLoss
                | Self::ProfitLossByClass
                | Self::BalanceSheet
                | Self::ArAgingSummary
                | Self::SalesByProduct
                | Self::ExpensesByVendor
        )
    }
}

pub fn get_by_key(key: &str) -> Option<ReportType> {
    let key = key.trim().to_ascii_lowercase().replace('-', "_");
    ALL_REPORT_TYPES.iter().find(|t| t.key() == key).copied()
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ReportType {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        get_by_key(s).ok_or_else(|| ImportError::UnknownReportType(s.trim().to_string()))
    }
}

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// `period` is a display token (`YYYY-MM`, `YYYY-Qn` or `YYYY`), not a key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub period: Option<String>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Parsed rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PnlCategory {
    Income,
    Cogs,
    Expense,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceCategory {
    Asset,
    Liability,
    Equity,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PnlRow {
    pub account: String,
    pub amount: f64,
    pub category: PnlCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRow {
    pub account: String,
    pub class: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceRow {
    pub account: String,
    pub amount: f64,
    pub category: BalanceCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgingRow {
    pub customer: String,
    pub current: f64,
    pub days1_30: f64,
    pub days31_60: f64,
    pub days61_90: f64,
    #[serde(rename = "daysOver90")]
    pub days_over_90: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRow {
    pub product: String,
    pub quantity: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorRow {
    pub vendor: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedRow {
    Pnl(PnlRow),
    Class(ClassRow),
    Balance(BalanceRow),
    Aging(AgingRow),
    Product(ProductRow),
    Vendor(VendorRow),
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlSummary {
    pub total_income: f64,
    #[serde(rename = "totalCOGS")]
    pub total_cogs: f64,
    pub gross_profit: f64,
    pub gross_margin_pct: f64,
    pub total_expenses: f64,
    pub net_income: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassTotals {
    pub revenue: f64,
    pub expenses: f64,
    pub margin: f64,
    pub margin_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    pub by_class: BTreeMap<String, ClassTotals>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub total_equity: f64,
    pub cash: f64,
    pub accounts_receivable: f64,
    pub accounts_payable: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgingSummary {
    pub total: f64,
    pub current: f64,
    pub days30: f64,
    pub days60: f64,
    pub days90: f64,
    #[serde(rename = "daysOver90")]
    pub days_over_90: f64,
    #[serde(rename = "over60Pct")]
    pub over_60_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub total_revenue: f64,
    pub product_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorSummary {
    pub total_expenses: f64,
    pub vendor_count: usize,
    pub top_vendors: Vec<VendorRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Summary {
    Pnl(PnlSummary),
    Class(ClassSummary),
    Balance(BalanceSummary),
    Aging(AgingSummary),
    Product(ProductSummary),
    Vendor(VendorSummary),
}

// ---------------------------------------------------------------------------
// Parse result
// ---------------------------------------------------------------------------

/// Output of one row parser, before the dispatcher attaches type and period.
#[derive(Debug, Clone)]
pub struct ParsedReport {
    pub parsed: Vec<ParsedRow>,
    pub summary: Summary,
    pub skipped_rows: usize,
}

/// The serialized shape is the stored contract: `type`, `period`,
/// `periodStart`, `periodEnd`, `parsed`, `summary`. The row diagnostics are
/// kept off the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    #[serde(flatten)]
    pub period: Period,
    pub parsed: Vec<ParsedRow>,
    pub summary: Summary,
    #[serde(skip)]
    pub data_start: usize,
    #[serde(skip)]
    pub skipped_rows: usize,
}
