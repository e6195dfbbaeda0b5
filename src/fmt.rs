/// Accounting-style dollars: $1,234.56, negatives in parentheses.
pub fn money(val: f64) -> String {
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    if val < 0.0 && cents != "0.00" {
        format!("$({grouped}.{dec_part})")
    } else {
        format!("${grouped}.{dec_part}")
    }
}

pub fn pct(val: f64) -> String {
    format!("{val:.1}%")
}

/// Render a summary value by its JSON key: `*Pct` as a percentage, `*Count`
/// as a plain integer, anything else as money.
pub fn summary_value(key: &str, val: f64) -> String {
    if key.ends_with("Pct") {
        pct(val)
    } else if key.ends_with("Count") {
        format!("{val:.0}")
    } else {
        money(val)
    }
}
