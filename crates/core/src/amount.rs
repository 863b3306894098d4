use rust_decimal::Decimal;
use std::str::FromStr;

/// Clean a numeral string: `"3, 400"` -> `"3400"`, `"77.00"` -> `"77"`,
/// `"₹500"` -> `"500"`.
///
/// Everything except ASCII digits and `.` is dropped. If a decimal point
/// remains the value is parsed; an integral value is returned without a
/// fractional part, anything else in its shortest exact form. A value that
/// does not parse (e.g. `"1.2.3"`) is returned as cleaned, not rejected.
pub fn normalize_amount(raw: &str) -> String {
    let clean: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if !clean.contains('.') {
        return clean;
    }

    match parse_amount(&clean) {
        Some(value) => value.normalize().to_string(),
        None => clean,
    }
}

/// Parse a cleaned numeral. Accepts a leading or trailing decimal point
/// (`".5"`, `"5."`) but requires at least one digit.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    if !s.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let mut padded = String::with_capacity(s.len() + 2);
    if s.starts_with('.') {
        padded.push('0');
    }
    padded.push_str(s);
    if s.ends_with('.') {
        padded.push('0');
    }
    Decimal::from_str(&padded).ok()
}

/// Number of digits in a normalized amount, ignoring decimal points.
pub fn digit_count(normalized: &str) -> usize {
    normalized.chars().filter(|c| *c != '.').count()
}
