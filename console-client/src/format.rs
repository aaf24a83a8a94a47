//! Display formatting for amounts and timestamps
//!
//! Console-side rendering helpers; nothing here touches the wire format.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount with thousands grouping and the currency code
///
/// # Examples
///
/// ```
/// use console_client::format::format_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_currency(Decimal::new(123456, 2), "LAK"), "1,234.56 LAK");
/// assert_eq!(format_currency(Decimal::new(500_000, 0), "LAK"), "500,000.00 LAK");
/// assert_eq!(format_currency(Decimal::new(75, 1), "THB"), "7.50 THB");
/// ```
pub fn format_currency(amount: Decimal, currency: &str) -> String {
    // half away from zero, the usual convention for money display
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int, frac)) => (int.to_string(), format!("{frac:0<2}")),
        None => (text, "00".to_string()),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part} {currency}")
}

/// Format a timestamp the way the console tables show it
///
/// # Examples
///
/// ```
/// use console_client::format::format_date;
/// use chrono::{TimeZone, Utc};
///
/// let ts = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap();
/// assert_eq!(format_date(&ts), "2024-01-15 14:30");
/// ```
pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_eq!(
            format_currency(Decimal::new(1_234_567_89, 2), "LAK"),
            "1,234,567.89 LAK"
        );
        assert_eq!(format_currency(Decimal::new(999, 0), "LAK"), "999.00 LAK");
        assert_eq!(format_currency(Decimal::new(1000, 0), "LAK"), "1,000.00 LAK");
    }

    #[test]
    fn test_format_currency_pads_decimals() {
        assert_eq!(format_currency(Decimal::new(5, 1), "THB"), "0.50 THB");
        assert_eq!(format_currency(Decimal::ZERO, "THB"), "0.00 THB");
    }

    #[test]
    fn test_format_currency_rounds_to_two_places() {
        assert_eq!(format_currency(Decimal::new(12345, 3), "USD"), "12.35 USD");
    }

    #[test]
    fn test_format_currency_negative_amounts() {
        assert_eq!(
            format_currency(Decimal::new(-123456, 2), "LAK"),
            "-1,234.56 LAK"
        );
    }

    #[test]
    fn test_format_date() {
        let ts = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(format_date(&ts), "2024-12-31 23:59");
    }
}
