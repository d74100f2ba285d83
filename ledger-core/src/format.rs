//! Display helpers for rendering a parse result.

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::ledger::NormalizedTransaction;

/// Transaction date for display: `YYYY-MM-DD HH:MM` when the source carried a
/// time of day, `YYYY-MM-DD` otherwise. Rendered in `tz`.
pub fn display_date(tx: &NormalizedTransaction, tz: Tz) -> String {
    let local = tx.date.with_timezone(&tz);
    if tx.has_time {
        local.format("%Y-%m-%d %H:%M").to_string()
    } else {
        local.format("%Y-%m-%d").to_string()
    }
}

/// `"2024-01"` -> `"Jan 2024"`. Unrecognised keys are returned as-is.
pub fn month_label(year_month: &str) -> String {
    NaiveDate::parse_from_str(&format!("{year_month}-01"), "%Y-%m-%d")
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|_| year_month.to_string())
}

/// US-dollar amount with thousands separators: `-1234.5` -> `-$1,234.50`.
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn tx_at(hour: u32, has_time: bool) -> NormalizedTransaction {
        NormalizedTransaction {
            date: Utc.with_ymd_and_hms(2024, 1, 5, hour, 7, 0).unwrap(),
            year_month: "2024-01".to_string(),
            status: "APPROVED".to_string(),
            tx_type: "POS_TX".to_string(),
            merchant_name: "Coffee Shop".to_string(),
            amount_usd: 4.5,
            has_time,
        }
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date(&tx_at(9, true), Tz::UTC), "2024-01-05 09:07");
        assert_eq!(display_date(&tx_at(0, false), Tz::UTC), "2024-01-05");
        assert_eq!(
            display_date(&tx_at(9, true), chrono_tz::America::Chicago),
            "2024-01-05 03:07"
        );
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label("2024-01"), "Jan 2024");
        assert_eq!(month_label("2023-12"), "Dec 2023");
        assert_eq!(month_label("garbage"), "garbage");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(4.5), "$4.50");
        assert_eq!(format_usd(-10.0), "-$10.00");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(999.999), "$1,000.00");
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(-0.001), "$0.00");
    }
}
