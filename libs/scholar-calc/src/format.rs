//! Display formatter
//!
//! Converts raw display text or numbers into the string shown to the user.
//! Every function here is pure, and formatting is idempotent:
//! `format_number(parse_display(&format_number(x, s)).unwrap(), s)` equals
//! `format_number(x, s)` for every finite `x`.

use crate::error::ErrorKind;
use crate::settings::Settings;

/// Magnitude above which exponential notation is forced
pub const MAX_PLAIN_MAGNITUDE: f64 = 999_999_999.0;

/// Fractional digits used by the forced exponential fallback
pub const OVERFLOW_EXPONENT_DIGITS: usize = 6;

const SCIENTIFIC_UPPER: f64 = 1e6;
const SCIENTIFIC_LOWER: f64 = 1e-3;
const GROUPING_THRESHOLD: f64 = 1000.0;

/// Parse display text (grouping separators allowed) into a finite number
pub fn parse_display(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Canonical unformatted text for a number, as stored in the session
pub fn raw_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Format display text, honouring an active error
pub fn format_display(raw: &str, error: Option<ErrorKind>, settings: &Settings) -> String {
    if let Some(kind) = error {
        return kind.message().to_string();
    }
    match parse_display(raw) {
        Some(value) => format_number(value, settings),
        None => raw.to_string(),
    }
}

/// Format a finite number for display
pub fn format_number(value: f64, settings: &Settings) -> String {
    if !value.is_finite() {
        return ErrorKind::Overflow.message().to_string();
    }
    format_with_depth(value, settings, 0)
}

fn format_with_depth(value: f64, settings: &Settings, depth: u8) -> String {
    let mut value = if value == 0.0 { 0.0 } else { value };

    if wants_scientific(value, settings) {
        let significant = settings.precision.max(1);
        let rendered = to_exponential(value, significant - 1);
        match parse_display(&rendered) {
            Some(back) if wants_scientific(back, settings) => return rendered,
            // Rounding pushed the value out of the scientific range
            Some(back) => value = back,
            None => return rendered,
        }
    }

    if value.abs() > MAX_PLAIN_MAGNITUDE {
        return to_exponential(value, OVERFLOW_EXPONENT_DIGITS);
    }

    let rounded = round_fixed(value, settings.precision);
    if rounded == 0.0 {
        return "0".to_string();
    }

    if rounded != value
        && depth < 2
        && (wants_scientific(rounded, settings) || rounded.abs() > MAX_PLAIN_MAGNITUDE)
    {
        return format_with_depth(rounded, settings, depth + 1);
    }

    // Shortest digits that read back as `rounded`, never the binary expansion
    let plain = raw_number(rounded);
    if rounded.abs() >= GROUPING_THRESHOLD {
        group_thousands(&plain)
    } else {
        plain
    }
}

fn wants_scientific(value: f64, settings: &Settings) -> bool {
    let magnitude = value.abs();
    settings.use_scientific_notation
        && (magnitude >= SCIENTIFIC_UPPER || (magnitude > 0.0 && magnitude < SCIENTIFIC_LOWER))
}

/// Exponential notation with `fraction_digits` mantissa digits, e.g. `1.50e+7`
pub fn to_exponential(value: f64, fraction_digits: usize) -> String {
    let rendered = format!("{:.*e}", fraction_digits, value);
    match rendered.split_once('e') {
        Some((mantissa, exponent)) => match exponent.strip_prefix('-') {
            Some(digits) => format!("{}e-{}", mantissa, digits),
            None => format!("{}e+{}", mantissa, exponent),
        },
        None => rendered,
    }
}

/// Round to `precision` fractional digits
fn round_fixed(value: f64, precision: usize) -> f64 {
    parse_display(&format!("{:.*}", precision, value)).unwrap_or(value)
}

/// Insert `,` between groups of three integer digits (en-US grouping)
fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(plain.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    fn defaults() -> Settings {
        Settings::default()
    }

    #[test]
    fn test_plain_values() {
        let s = defaults();
        assert_eq!(format_number(20.0, &s), "20");
        assert_eq!(format_number(4.0, &s), "4");
        assert_eq!(format_number(0.1 + 0.2, &s), "0.3");
        assert_eq!(format_number(-0.0, &s), "0");
        assert_eq!(format_number(-12.5, &s), "-12.5");
        assert_eq!(format_number(1.0 / 3.0, &s), "0.3333333333");
    }

    #[test]
    fn test_grouping() {
        let s = defaults();
        assert_eq!(format_number(1000.0, &s), "1,000");
        assert_eq!(format_number(1234567.5, &s), "1,234,567.5");
        assert_eq!(format_number(-98765.4321, &s), "-98,765.4321");
        assert_eq!(format_number(999999999.0, &s), "999,999,999");
    }

    #[test]
    fn test_overflow_fallback_ignores_toggle() {
        let s = defaults();
        assert_eq!(format_number(1234567890.0, &s), "1.234568e+9");
        assert_eq!(format_number(-5e20, &s), "-5.000000e+20");
    }

    #[test]
    fn test_scientific_notation() {
        let s = defaults().with_scientific_notation(true).with_precision(4);
        assert_eq!(format_number(1234567.0, &s), "1.235e+6");
        assert_eq!(format_number(0.000123, &s), "1.230e-4");
        assert_eq!(format_number(12.5, &s), "12.5");
        assert_eq!(format_number(0.0, &s), "0");
    }

    #[test]
    fn test_rounding_at_range_edges() {
        let s = defaults().with_precision(2);
        assert_eq!(format_number(999.999, &s), "1,000");

        let sci = defaults().with_scientific_notation(true).with_precision(3);
        assert_eq!(format_number(999999.9999, &sci), "1.00e+6");
        assert_eq!(format_number(0.00099999, &sci), "0.001");
    }

    #[test]
    fn test_high_precision_uses_shortest_digits() {
        let s = defaults().with_precision(20);
        assert_eq!(format_number(0.1, &s), "0.1");
        assert_eq!(format_number(1234.5678, &s), "1,234.5678");
        assert_eq!(format_number(1.0 / 3.0, &s), "0.3333333333333333");

        let s = defaults().with_precision(17);
        assert_eq!(format_number(0.1 + 0.2, &s), "0.30000000000000004");
        assert_eq!(format_number(-2.5, &s), "-2.5");
    }

    #[test]
    fn test_error_and_unparsable_input() {
        let s = defaults();
        assert_eq!(
            format_display("12", Some(ErrorKind::DivisionByZero), &s),
            "Division by zero"
        );
        assert_eq!(format_display("Math Error", None, &s), "Math Error");
        assert_eq!(format_display("1,234.5", None, &s), "1,234.5");
        assert_eq!(format_display("3.", None, &s), "3");
    }

    #[test]
    fn test_idempotent() {
        let values = [
            0.0,
            1.0,
            -1.5,
            0.1 + 0.2,
            1.0 / 3.0,
            999.99999999999,
            1234.5678,
            999999.9999999,
            123456789.123,
            999999999.6,
            1e15,
            -2.5e-7,
            0.00099999,
            std::f64::consts::PI * 1e8,
        ];
        let settings = [
            defaults(),
            defaults().with_precision(0),
            defaults().with_precision(3),
            defaults().with_precision(20),
            defaults().with_scientific_notation(true),
            defaults().with_scientific_notation(true).with_precision(2),
        ];
        for s in &settings {
            for &x in &values {
                let once = format_number(x, s);
                let twice = format_number(parse_display(&once).unwrap(), s);
                assert_eq!(once, twice, "value {} with {:?}", x, s);
            }
        }
    }

    #[test]
    fn test_raw_number() {
        assert_eq!(raw_number(4.0), "4");
        assert_eq!(raw_number(-0.0), "0");
        assert_eq!(raw_number(0.25), "0.25");
        assert_eq!(parse_display("inf"), None);
        assert_eq!(parse_display("."), None);
    }
}
