use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Error returned when `--now` is not a recognised date or date-time.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid date-time '{0}' (expected YYYY-MM-DD, YYYY-MM-DDTHH:MM[:SS] or YYYY-MM-DD HH:MM[:SS])")]
pub struct ParseNowError(pub String);

const NOW_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a wall-clock "now" override. A bare date means noon of that day.
pub fn parse_now(s: &str) -> Result<NaiveDateTime, ParseNowError> {
    let s = s.trim();
    for format in NOW_FORMATS {
        if let Ok(now) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(now);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| NaiveTime::from_hms_opt(12, 0, 0).map(|noon| date.and_time(noon)))
        .ok_or_else(|| ParseNowError(s.to_string()))
}

/// Display symbol for an ISO currency code, if one is known.
pub fn currency_symbol(code: &str) -> Option<&'static str> {
    match code.trim().to_ascii_uppercase().as_str() {
        "CRC" => Some("₡"),
        "USD" => Some("$"),
        "EUR" => Some("€"),
        _ => None,
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats `amount` with two decimals, thousands separators and the currency
/// symbol, e.g. `₡1,644,450.00`. Unknown codes are appended as a suffix.
pub fn format_amount(
    amount: Decimal,
    currency: &str,
) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let grouped = group_thousands(int_part);

    match currency_symbol(currency) {
        Some(symbol) => format!("{sign}{symbol}{grouped}.{frac_part}"),
        None => format!(
            "{sign}{grouped}.{frac_part} {}",
            currency.trim().to_ascii_uppercase()
        ),
    }
}

/// Formats a fraction such as `0.1083` as `10.83%`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_now_accepts_date_time_layouts() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 10)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();

        assert_eq!(parse_now("2025-06-10T18:30:00"), Ok(expected));
        assert_eq!(parse_now("2025-06-10 18:30"), Ok(expected));
    }

    #[test]
    fn parse_now_bare_date_is_noon() {
        assert_eq!(
            parse_now(" 2024-02-29 ").unwrap().to_string(),
            "2024-02-29 12:00:00"
        );
    }

    #[test]
    fn parse_now_rejects_garbage() {
        assert_eq!(
            parse_now("tomorrow"),
            Err(ParseNowError("tomorrow".to_string()))
        );
    }

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(format_amount(dec!(1644450), "CRC"), "₡1,644,450.00");
        assert_eq!(format_amount(dec!(999.5), "USD"), "$999.50");
        assert_eq!(format_amount(dec!(100000), "crc"), "₡100,000.00");
        assert_eq!(format_amount(dec!(0), "CRC"), "₡0.00");
    }

    #[test]
    fn format_amount_negative_and_rounding() {
        assert_eq!(format_amount(dec!(-1000), "CRC"), "-₡1,000.00");
        assert_eq!(format_amount(dec!(15250.505), "CRC"), "₡15,250.51");
        assert_eq!(format_amount(dec!(-0.001), "CRC"), "₡0.00");
    }

    #[test]
    fn format_amount_unknown_currency_suffix() {
        assert_eq!(format_amount(dec!(1234567.8), "mxn"), "1,234,567.80 MXN");
    }

    #[test]
    fn format_rate_trims_trailing_zeros() {
        assert_eq!(format_rate(dec!(0.1083)), "10.83%");
        assert_eq!(format_rate(dec!(0.10)), "10%");
    }
}
