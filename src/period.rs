use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};

use crate::detector::HEADER_ROWS;
use crate::models::Period;
use crate::sheet::RawSheet;

const MONTH: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";
const RANGE_SEP: &str = r"\s*(?:-|–|—|to|through)\s*";

struct Patterns {
    date_range: Regex,
    single_month: Regex,
    month_range: Regex,
}

fn patterns() -> Option<&'static Patterns> {
    static COMPILED: OnceLock<Option<Patterns>> = OnceLock::new();
    COMPILED
        .get_or_init(|| {
            let date = r"(\d{1,2})/(\d{1,2})/(\d{4})";
            Some(Patterns {
                date_range: Regex::new(&format!("{date}{RANGE_SEP}{date}")).ok()?,
                // The optional leading month lets a hit on "January - December
                // 2025" be recognised as a range and passed over.
                single_month: Regex::new(&format!(
                    r"(?i)(?:\b{MONTH}{RANGE_SEP})?\b{MONTH}\s+(\d{{4}})\b"
                ))
                .ok()?,
                month_range: Regex::new(&format!(
                    r"(?i)\b{MONTH}{RANGE_SEP}{MONTH},?\s+(\d{{4}})\b"
                ))
                .ok()?,
            })
        })
        .as_ref()
}

/// Derive the reporting period from the title rows. Explicit date ranges
/// win over "Month YYYY", which wins over "Month - Month YYYY".
pub fn extract_period(sheet: &RawSheet) -> Period {
    let text = sheet.header_text(HEADER_ROWS);
    let Some(p) = patterns() else {
        return Period::default();
    };
    let found = date_range(p, &text)
        .or_else(|| single_month(p, &text))
        .or_else(|| month_range(p, &text));
    match &found {
        Some(period) => log::debug!("period {:?}", period.period),
        None => log::debug!("no period found in first {HEADER_ROWS} rows"),
    }
    found.unwrap_or_default()
}

fn date_range(p: &Patterns, text: &str) -> Option<Period> {
    p.date_range.captures_iter(text).find_map(|caps| {
        let a = mdy(&caps, 1)?;
        let b = mdy(&caps, 4)?;
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        let period = if start.year() == end.year() && start.month() == end.month() {
            month_token(start.year(), start.month())
        } else {
            quarter_token(end.year(), end.month())
        };
        Some(Period {
            period: Some(period),
            period_start: Some(start),
            period_end: Some(end),
        })
    })
}

fn single_month(p: &Patterns, text: &str) -> Option<Period> {
    p.single_month.captures_iter(text).find_map(|caps| {
        if caps.get(1).is_some() {
            return None;
        }
        let month = month_number(caps.get(2)?.as_str())?;
        let year: i32 = caps.get(3)?.as_str().parse().ok()?;
        Some(Period {
            period: Some(month_token(year, month)),
            period_start: NaiveDate::from_ymd_opt(year, month, 1),
            period_end: last_day_of_month(year, month),
        })
    })
}

fn month_range(p: &Patterns, text: &str) -> Option<Period> {
    p.month_range.captures_iter(text).find_map(|caps| {
        let from = month_number(caps.get(1)?.as_str())?;
        let to = month_number(caps.get(2)?.as_str())?;
        let year: i32 = caps.get(3)?.as_str().parse().ok()?;
        // "October - March 2025" is a fiscal range that began the prior year.
        let start_year = if from > to { year - 1 } else { year };
        let period = if from == 1 && to == 12 {
            year.to_string()
        } else {
            quarter_token(year, to)
        };
        Some(Period {
            period: Some(period),
            period_start: NaiveDate::from_ymd_opt(start_year, from, 1),
            period_end: last_day_of_month(year, to),
        })
    })
}

fn mdy(caps: &Captures<'_>, first: usize) -> Option<NaiveDate> {
    let m: u32 = caps.get(first)?.as_str().parse().ok()?;
    let d: u32 = caps.get(first + 1)?.as_str().parse().ok()?;
    let y: i32 = caps.get(first + 2)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

pub fn month_number(name: &str) -> Option<u32> {
    let name = name.trim().trim_end_matches('.').to_lowercase();
    let prefix = name.get(..3)?;
    let n = match prefix {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(n)
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()
}

fn month_token(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

fn quarter_token(year: i32, end_month: u32) -> String {
    format!("{year:04}-Q{}", end_month.div_ceil(3))
}
