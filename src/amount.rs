use crate::sheet::Cell;

/// Parse an exported amount: `$1,234.56`, `(500.00)`, `-$50`, or a numeric
/// cell. The longest leading number is used, so `500-` is 500 and `1.2.3`
/// is 1.2. Anything with no leading number is 0.
pub fn parse_amount(raw: &str) -> f64 {
    let s: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '$' && *c != '"')
        .collect();
    let s = match s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        Some(inner) => format!("-{inner}"),
        None => s,
    };
    let s: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    match numeric_prefix(&s).parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

// `-?digits[.digits]`, stopping at the first character that breaks it.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => {}
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    &s[..end]
}

pub fn cell_amount(cell: Option<&Cell>) -> f64 {
    match cell {
        Some(Cell::Number(n)) if n.is_finite() => *n,
        Some(Cell::Text(s)) => parse_amount(s),
        _ => 0.0,
    }
}
