//! Row normalizer: validates one decoded record and maps it to a
//! [`NormalizedTransaction`].

use std::fmt;

use ledger_core::time::{has_time_of_day, parse_transaction_date, year_month};
use ledger_core::{NormalizedTransaction, ParseOptions, REFUND_TYPE, RawRecord, UNKNOWN_MERCHANT};

pub const DATE_FIELD: &str = "date";
pub const STATUS_FIELD: &str = "status";
pub const TYPE_FIELD: &str = "type";
pub const MERCHANT_FIELD: &str = "merchantName";
/// Preferred amount column
pub const ACCOUNT_AMOUNT_FIELD: &str = "accountAmount";
/// Fallback amount column
pub const USD_AMOUNT_FIELD: &str = "USDAmount";

/// Why a row could not be normalized. `Display` gives the warning text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowWarning {
    MissingDate,
    /// Carries the trimmed date string
    InvalidDate(String),
    /// Carries the trimmed date string
    MissingAmount(String),
}

impl fmt::Display for RowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowWarning::MissingDate => f.write_str("Row missing date"),
            RowWarning::InvalidDate(raw) => write!(f, "Invalid date: {raw}"),
            RowWarning::MissingAmount(date) => write!(f, "Row missing amount fields for {date}"),
        }
    }
}

fn trimmed<'a>(record: &'a RawRecord, field: &str) -> &'a str {
    record.get(field).map(str::trim).unwrap_or("")
}

/// Strict numeric parse: surrounding whitespace is tolerated, the rest must be
/// a finite number. Empty means absent.
pub fn parse_amount(raw: Option<&str>) -> Option<f64> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Signed spend amount: refunds are negative, every other type positive.
pub fn signed_amount(tx_type: &str, raw: f64) -> f64 {
    if tx_type == REFUND_TYPE {
        -raw.abs()
    } else {
        raw.abs()
    }
}

/// Normalize one record. The first failing check decides the warning.
pub fn normalize(
    record: &RawRecord,
    opts: &ParseOptions,
) -> Result<NormalizedTransaction, RowWarning> {
    let raw_date = trimmed(record, DATE_FIELD);
    if raw_date.is_empty() {
        return Err(RowWarning::MissingDate);
    }

    let date = parse_transaction_date(raw_date, opts.timezone)
        .ok_or_else(|| RowWarning::InvalidDate(raw_date.to_string()))?;
    let has_time = has_time_of_day(raw_date);

    let status = trimmed(record, STATUS_FIELD).to_string();
    let tx_type = trimmed(record, TYPE_FIELD).to_string();

    let merchant_name = match trimmed(record, MERCHANT_FIELD) {
        "" => UNKNOWN_MERCHANT.to_string(),
        name => name.to_string(),
    };

    let raw_amount = parse_amount(record.get(ACCOUNT_AMOUNT_FIELD))
        .or_else(|| parse_amount(record.get(USD_AMOUNT_FIELD)))
        .ok_or_else(|| RowWarning::MissingAmount(raw_date.to_string()))?;

    Ok(NormalizedTransaction {
        year_month: year_month(&date),
        date,
        amount_usd: signed_amount(&tx_type, raw_amount),
        status,
        tx_type,
        merchant_name,
        has_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        RawRecord::from_pairs(pairs.iter().copied())
    }

    fn norm(pairs: &[(&str, &str)]) -> Result<NormalizedTransaction, RowWarning> {
        normalize(&record(pairs), &ParseOptions::default())
    }

    #[test]
    fn test_purchase_amount_is_absolute() {
        let tx = norm(&[
            ("date", "2024-01-05"),
            ("status", "APPROVED"),
            ("type", "POS_TX"),
            ("merchantName", "Coffee Shop"),
            ("accountAmount", "-4.50"),
        ])
        .unwrap();
        assert_eq!(tx.amount_usd, 4.50);
        assert_eq!(tx.year_month, "2024-01");
        assert_eq!(tx.merchant_name, "Coffee Shop");
        assert!(!tx.has_time);
    }

    #[test]
    fn test_refund_is_negative() {
        let tx = norm(&[("date", "2024-01-09"), ("type", "REFUND"), ("accountAmount", "10.00")])
            .unwrap();
        assert_eq!(tx.amount_usd, -10.0);

        let tx = norm(&[("date", "2024-01-09"), ("type", "REFUND"), ("accountAmount", "-10.00")])
            .unwrap();
        assert_eq!(tx.amount_usd, -10.0);
    }

    #[test]
    fn test_other_types_are_positive() {
        let tx = norm(&[("date", "2024-01-09"), ("type", "TRANSFER"), ("accountAmount", "-7")])
            .unwrap();
        assert_eq!(tx.amount_usd, 7.0);
    }

    #[test]
    fn test_missing_date() {
        assert_eq!(norm(&[("accountAmount", "1")]), Err(RowWarning::MissingDate));
        assert_eq!(norm(&[("date", "   ")]), Err(RowWarning::MissingDate));
        assert_eq!(RowWarning::MissingDate.to_string(), "Row missing date");
    }

    #[test]
    fn test_invalid_date_uses_trimmed_raw() {
        let err = norm(&[("date", " not-a-date "), ("accountAmount", "1")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid date: not-a-date");
    }

    #[test]
    fn test_date_checked_before_amount() {
        let err = norm(&[("date", "bogus")]).unwrap_err();
        assert_eq!(err, RowWarning::InvalidDate("bogus".to_string()));
    }

    #[test]
    fn test_amount_fallback_to_usd() {
        let tx = norm(&[("date", "2024-01-05"), ("accountAmount", "n/a"), ("USDAmount", " 12.25 ")])
            .unwrap();
        assert_eq!(tx.amount_usd, 12.25);

        let tx =
            norm(&[("date", "2024-01-05"), ("accountAmount", ""), ("USDAmount", "3")]).unwrap();
        assert_eq!(tx.amount_usd, 3.0);
    }

    #[test]
    fn test_account_amount_preferred() {
        let tx =
            norm(&[("date", "2024-01-05"), ("accountAmount", "5"), ("USDAmount", "6")]).unwrap();
        assert_eq!(tx.amount_usd, 5.0);
    }

    #[test]
    fn test_missing_amount_warning() {
        let err = norm(&[("date", "2024-01-05"), ("accountAmount", "abc"), ("USDAmount", " ")])
            .unwrap_err();
        assert_eq!(err.to_string(), "Row missing amount fields for 2024-01-05");
    }

    #[test]
    fn test_parse_amount_strict() {
        assert_eq!(parse_amount(Some(" 1e2 ")), Some(100.0));
        assert_eq!(parse_amount(Some("+3.5")), Some(3.5));
        assert_eq!(parse_amount(Some("1,234.00")), None);
        assert_eq!(parse_amount(Some("$5")), None);
        assert_eq!(parse_amount(Some("inf")), None);
        assert_eq!(parse_amount(Some("NaN")), None);
        assert_eq!(parse_amount(Some("")), None);
        assert_eq!(parse_amount(None), None);
    }

    #[test]
    fn test_unknown_merchant_placeholder() {
        let tx = norm(&[("date", "2024-01-05"), ("merchantName", "  "), ("accountAmount", "1")])
            .unwrap();
        assert_eq!(tx.merchant_name, UNKNOWN_MERCHANT);

        let tx = norm(&[("date", "2024-01-05"), ("accountAmount", "1")]).unwrap();
        assert_eq!(tx.merchant_name, UNKNOWN_MERCHANT);
        assert_eq!(tx.status, "");
        assert_eq!(tx.tx_type, "");
    }

    #[test]
    fn test_status_and_type_trimmed() {
        let tx = norm(&[
            ("date", "2024-01-05"),
            ("status", " APPROVED "),
            ("type", " POS_TX"),
            ("accountAmount", "1"),
        ])
        .unwrap();
        assert_eq!(tx.status, "APPROVED");
        assert_eq!(tx.tx_type, "POS_TX");
    }

    #[test]
    fn test_has_time_flag() {
        let tx = norm(&[("date", "2024-01-05 18:45"), ("accountAmount", "1")]).unwrap();
        assert!(tx.has_time);
        assert_eq!(tx.year_month, "2024-01");
    }

    #[test]
    fn test_month_follows_utc() {
        let tx = norm(&[("date", "2024-01-31T23:30:00-05:00"), ("accountAmount", "1")]).unwrap();
        assert_eq!(tx.year_month, "2024-02");
    }
}
