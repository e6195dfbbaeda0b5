use colored::Colorize;
use comfy_table::{Cell, Table};
use serde_json::Value;

use crate::fmt::{money, pct, summary_value};

/// `totalCOGS` -> `Total COGS`, `over60Pct` -> `Over60 Pct`.
pub fn humanize(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;
    for c in key.chars() {
        if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            out.push(' ');
        }
        if prev.is_none() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

fn number(v: &Value, key: &str) -> f64 {
    v.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Print a stored or freshly parsed summary object.
pub fn print_summary(title: &str, summary: &Value) {
    let Some(fields) = summary.as_object() else {
        return;
    };

    let mut table = Table::new();
    table.set_header(vec!["Summary", "Value"]);
    let mut nested = Vec::new();
    let mut has_rows = false;
    for (key, val) in fields {
        match val {
            Value::Number(n) => {
                let n = n.as_f64().unwrap_or(0.0);
                let rendered = summary_value(key, n);
                let rendered = if n < 0.0 {
                    rendered.red().to_string()
                } else {
                    rendered
                };
                table.add_row(vec![Cell::new(humanize(key)), Cell::new(rendered)]);
                has_rows = true;
            }
            Value::Object(_) | Value::Array(_) => nested.push((key, val)),
            _ => {}
        }
    }
    if has_rows {
        println!("{}\n{table}", title.bold());
    } else {
        println!("{}", title.bold());
    }

    for (key, val) in nested {
        match val {
            Value::Object(by_class) => print_class_table(key, by_class),
            Value::Array(rows) => print_ranked_table(key, rows),
            _ => {}
        }
    }
}

fn print_class_table(key: &str, by_class: &serde_json::Map<String, Value>) {
    let mut table = Table::new();
    table.set_header(vec!["Class", "Revenue", "Expenses", "Margin", "Margin %"]);
    for (class, totals) in by_class {
        table.add_row(vec![
            Cell::new(class),
            Cell::new(money(number(totals, "revenue"))),
            Cell::new(money(number(totals, "expenses"))),
            Cell::new(money(number(totals, "margin"))),
            Cell::new(pct(number(totals, "marginPct"))),
        ]);
    }
    println!("\n{}\n{table}", humanize(key).bold());
}

fn print_ranked_table(key: &str, rows: &[Value]) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Vendor", "Amount"]);
    for (i, row) in rows.iter().enumerate() {
        let name = row.get("vendor").and_then(Value::as_str).unwrap_or("");
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(name),
            Cell::new(money(number(row, "amount"))),
        ]);
    }
    println!("\n{}\n{table}", humanize(key).bold());
}
