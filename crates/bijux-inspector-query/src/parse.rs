// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%b %d %Y",
    "%b %d, %Y",
    "%d %b %Y",
    "%a %b %d %Y",
];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parses a float after stripping `,` and `_` separators. Non-finite results are rejected.
#[must_use]
pub fn parse_f64_relaxed(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    let cleaned = t.replace([',', '_'], "");
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// ISO, US (`m/d/Y`) and slash-ISO dates, month-name forms such as
/// `Jan 05 2024`, and date-times (RFC 3339 or naive) reduced to their date.
#[must_use]
pub fn parse_date_relaxed(s: &str) -> Option<NaiveDate> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(t, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(t).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(t, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[must_use]
pub fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Blank, unparseable, non-finite or non-positive input means "no cap".
#[must_use]
pub fn parse_max_rows_scan(text: &str) -> Option<usize> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    let n = t.parse::<f64>().ok()?;
    if !n.is_finite() || n <= 0.0 {
        return None;
    }
    let floored = n.floor();
    if floored < 1.0 {
        return None;
    }
    Some(floored.min(usize::MAX as f64) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relaxed_numbers_accept_separators() {
        assert_eq!(parse_f64_relaxed("1,234.5"), Some(1234.5));
        assert_eq!(parse_f64_relaxed(" 1_000 "), Some(1000.0));
        assert_eq!(parse_f64_relaxed("-3e2"), Some(-300.0));
        assert_eq!(parse_f64_relaxed(""), None);
        assert_eq!(parse_f64_relaxed("abc"), None);
        assert_eq!(parse_f64_relaxed("inf"), None);
    }

    #[test]
    fn relaxed_dates_accept_three_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 1);
        assert_eq!(parse_date_relaxed("2024-02-01"), expected);
        assert_eq!(parse_date_relaxed("02/01/2024"), expected);
        assert_eq!(parse_date_relaxed("2024/02/01"), expected);
        assert_eq!(parse_date_relaxed("2024-13-01"), None);
        assert_eq!(parse_date_relaxed("soon"), None);
    }

    #[test]
    fn relaxed_dates_accept_datetimes_and_month_names() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5);
        assert_eq!(parse_date_relaxed("2024-01-05T10:00:00Z"), expected);
        assert_eq!(parse_date_relaxed("2024-01-05T23:30:00+02:00"), expected);
        assert_eq!(parse_date_relaxed("2024-01-05 10:00:00"), expected);
        assert_eq!(parse_date_relaxed("2024-01-05T10:00:00"), expected);
        assert_eq!(parse_date_relaxed("2024-01-05T10:00:00.250"), expected);
        assert_eq!(parse_date_relaxed("Jan 05 2024"), expected);
        assert_eq!(parse_date_relaxed("Jan 05, 2024"), expected);
        assert_eq!(parse_date_relaxed("05 Jan 2024"), expected);
        assert_eq!(parse_date_relaxed("12:00:00"), None);
        assert_eq!(parse_date_relaxed("1700"), None);
    }

    #[test]
    fn max_rows_scan_is_lenient() {
        assert_eq!(parse_max_rows_scan(""), None);
        assert_eq!(parse_max_rows_scan("abc"), None);
        assert_eq!(parse_max_rows_scan("-5"), None);
        assert_eq!(parse_max_rows_scan("0"), None);
        assert_eq!(parse_max_rows_scan("0.5"), None);
        assert_eq!(parse_max_rows_scan("250.9"), Some(250));
        assert_eq!(parse_max_rows_scan(" 1000 "), Some(1000));
    }
}
