//! Utility functions

use crate::constants::APP_NAME;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

/// Get the application data directory path
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Parse a decimal amount string, accepting scientific notation
pub fn parse_amount(amount: &str) -> Option<Decimal> {
    let amount = amount.trim();
    Decimal::from_str(amount)
        .or_else(|_| Decimal::from_scientific(amount))
        .ok()
}

/// Split a plain decimal string into sign, integer digits and fraction digits
fn split_plain(amount: &str) -> Option<(bool, &str, &str)> {
    let amount = amount.trim();
    let (negative, digits) = match amount.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, amount.strip_prefix('+').unwrap_or(amount)),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((negative, int_part, frac_part))
}

/// Thousands separators on the integer part, trailing zeros trimmed
fn group_digits(negative: bool, int_part: &str, frac_part: &str) -> String {
    let int_part = int_part.trim_start_matches('0');
    let frac_part = frac_part.trim_end_matches('0');
    if int_part.is_empty() && frac_part.is_empty() {
        return "0".to_string();
    }
    let int_part = if int_part.is_empty() { "0" } else { int_part };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

/// Format `amount / 10^places` with thousands separators.
///
/// The decimal point is moved on the digit string itself, so amounts of any
/// length keep every digit. Scientific notation goes through `Decimal` first.
/// Returns `None` when the amount is not a number.
pub fn format_scaled(amount: &str, places: u32) -> Option<String> {
    let plain;
    let (negative, int_part, frac_part) = match split_plain(amount) {
        Some(parts) => parts,
        None => {
            plain = parse_amount(amount)?.to_string();
            split_plain(&plain)?
        }
    };

    let places = places as usize;
    let digits = format!("{}{}", int_part, frac_part);
    let point = int_part.len();
    let (int_digits, frac_digits) = if point >= places {
        let (i, f) = digits.split_at(point - places);
        (i.to_string(), f.to_string())
    } else {
        (String::new(), format!("{}{}", "0".repeat(places - point), digits))
    };
    Some(group_digits(negative, &int_digits, &frac_digits))
}

/// Shorten an address to `abcdef...uvwxyz`
pub fn format_address(address: &str, wrap: bool) -> String {
    let chars: Vec<char> = address.chars().collect();
    let short = if chars.len() <= 16 {
        address.to_string()
    } else {
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 6..].iter().collect();
        format!("{}...{}", head, tail)
    };
    if wrap {
        format!("({})", short)
    } else {
        short
    }
}

/// Format a millisecond timestamp as `YYYY-MM-DD HH:MM` (UTC)
pub fn format_date(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms)
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(s: &str) -> String {
        format_scaled(s, 0).unwrap()
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(count("1234567"), "1,234,567");
        assert_eq!(count("100"), "100");
        assert_eq!(count("1000"), "1,000");
        assert_eq!(count("-1234.5"), "-1,234.5");
    }

    #[test]
    fn trims_trailing_zeros() {
        assert_eq!(count("150.000"), "150");
        assert_eq!(count("0.0500"), "0.05");
        assert_eq!(count("0.000"), "0");
    }

    #[test]
    fn parses_scientific_notation() {
        assert_eq!(count("1e3"), "1,000");
        assert_eq!(format_scaled("15e4", 3).as_deref(), Some("150"));
        assert!(parse_amount("not a number").is_none());
        assert!(format_scaled("not a number", 2).is_none());
        assert!(format_scaled(".", 2).is_none());
    }

    #[test]
    fn scales_amounts_beyond_fixed_precision() {
        let amount = "1000000000000000000000000000000";
        assert_eq!(format_scaled(amount, 18).as_deref(), Some("1,000,000,000,000"));
        assert_eq!(
            format_scaled("123456789012345678901234567890123", 3).as_deref(),
            Some("123,456,789,012,345,678,901,234,567,890.123")
        );
        let tiny = format!("0.{}1", "0".repeat(29));
        assert_eq!(format_scaled("1", 30), Some(tiny));
        assert_eq!(format_scaled("-2500", 2).as_deref(), Some("-25"));
        assert_eq!(format_scaled("-0.00", 2).as_deref(), Some("0"));
    }

    #[test]
    fn shortens_long_addresses() {
        let addr = "abcdefghijklmnopqrstuvwxyz0123456789ABCDEFG";
        assert_eq!(format_address(addr, false), "abcdef...BCDEFG");
        assert_eq!(format_address(addr, true), "(abcdef...BCDEFG)");
        assert_eq!(format_address("short", false), "short");
    }

    #[test]
    fn formats_millisecond_timestamps() {
        assert_eq!(format_date(0), "1970-01-01 00:00");
        assert_eq!(format_date(1_700_000_000_000), "2023-11-14 22:13");
    }
}
