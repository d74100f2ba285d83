//! Ledger record types: decoded rows, normalized transactions and the parse result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status value a row must carry to be counted.
pub const APPROVED_STATUS: &str = "APPROVED";
/// Transaction type for card purchases.
pub const PURCHASE_TYPE: &str = "POS_TX";
/// Transaction type for refunds; its amount is always negated.
pub const REFUND_TYPE: &str = "REFUND";
/// Merchant name used when the source row leaves it blank.
pub const UNKNOWN_MERCHANT: &str = "(unknown merchant)";

/// One decoded row, keyed by trimmed header name. Values are never coerced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(header, value)` pairs. The first value wins when
    /// a header repeats.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Self::new();
        for (k, v) in pairs {
            record.insert(k, v);
        }
        record
    }

    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(header.into()).or_insert_with(|| value.into());
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A validated transaction row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTransaction {
    /// Instant of the transaction, UTC, millisecond precision
    pub date: DateTime<Utc>,
    /// `YYYY-MM` of `date` in UTC
    pub year_month: String,
    pub status: String,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub merchant_name: String,
    /// Positive = spend, negative = refund.
    pub amount_usd: f64,
    /// Source date string carried an `HH:MM` time of day
    pub has_time: bool,
}

/// Signed spend total for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthTotal {
    pub year_month: String,
    pub total_usd: f64,
}

/// Counts, date range and diagnostics for one parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseSummary {
    /// Non-blank records that reached normalization
    pub total_rows: usize,
    pub included_rows: usize,
    /// Always `total_rows - included_rows`
    pub ignored_rows: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<DateTime<Utc>>,
    pub warnings: Vec<String>,
}

/// Everything produced from one input text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub summary: ParseSummary,
    /// Ascending by `year_month`, one entry per month
    pub month_totals: Vec<MonthTotal>,
    /// Included transactions in input order
    pub transactions: Vec<NormalizedTransaction>,
}

impl ParseResult {
    /// Sum of all month totals.
    pub fn net_spend(&self) -> f64 {
        self.month_totals.iter().map(|m| m.total_usd).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tx(tx_type: &str, status: &str, amount: f64) -> NormalizedTransaction {
        NormalizedTransaction {
            date: Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
            year_month: "2024-01".to_string(),
            status: status.to_string(),
            tx_type: tx_type.to_string(),
            merchant_name: "Coffee Shop".to_string(),
            amount_usd: amount,
            has_time: false,
        }
    }

    #[test]
    fn test_raw_record_first_header_wins() {
        let record = RawRecord::from_pairs([("date", "2024-01-05"), ("date", "2024-02-01")]);
        assert_eq!(record.get("date"), Some("2024-01-05"));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_transaction_json_shape() {
        let json = serde_json::to_value(tx(REFUND_TYPE, APPROVED_STATUS, -10.0)).unwrap();
        assert_eq!(json["type"], "REFUND");
        assert_eq!(json["yearMonth"], "2024-01");
        assert_eq!(json["merchantName"], "Coffee Shop");
        assert_eq!(json["amountUsd"], -10.0);
        assert_eq!(json["hasTime"], false);
    }

    #[test]
    fn test_summary_omits_missing_range() {
        let json = serde_json::to_value(ParseSummary::default()).unwrap();
        assert!(json.get("earliest").is_none());
        assert!(json.get("latest").is_none());
        assert_eq!(json["totalRows"], 0);
    }

    #[test]
    fn test_net_spend_sums_months() {
        let month = |year_month: &str, total_usd: f64| MonthTotal {
            year_month: year_month.to_string(),
            total_usd,
        };
        let result = ParseResult {
            month_totals: vec![month("2024-01", 80.0), month("2024-03", 5.0)],
            ..Default::default()
        };
        assert_eq!(result.net_spend(), 85.0);
        assert_eq!(ParseResult::default().net_spend(), 0.0);
    }
}
