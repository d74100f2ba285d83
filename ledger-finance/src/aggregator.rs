//! Inclusion filter, date-range tracking and monthly spend aggregation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ledger_core::{APPROVED_STATUS, MonthTotal, NormalizedTransaction, PURCHASE_TYPE, REFUND_TYPE};

/// Approved purchases and approved refunds count; everything else is ignored.
/// Matching is exact and case-sensitive.
pub fn is_included(tx: &NormalizedTransaction) -> bool {
    tx.status == APPROVED_STATUS && (tx.tx_type == PURCHASE_TYPE || tx.tx_type == REFUND_TYPE)
}

/// Running earliest/latest over included transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn observe(&mut self, at: DateTime<Utc>) {
        match self.earliest {
            Some(e) if at >= e => {}
            _ => self.earliest = Some(at),
        }
        match self.latest {
            Some(l) if at <= l => {}
            _ => self.latest = Some(at),
        }
    }
}

/// Groups transactions into calendar-month totals
pub struct SpendAggregator;

impl SpendAggregator {
    /// Signed sum of `amount_usd` per `year_month`, ascending by key.
    pub fn month_totals(txns: &[NormalizedTransaction]) -> Vec<MonthTotal> {
        let mut months: BTreeMap<&str, f64> = BTreeMap::new();
        for tx in txns {
            *months.entry(tx.year_month.as_str()).or_insert(0.0) += tx.amount_usd;
        }

        months
            .into_iter()
            .map(|(year_month, total_usd)| MonthTotal {
                year_month: year_month.to_string(),
                total_usd,
            })
            .collect()
    }

    /// Net spend per merchant within one month, largest first.
    pub fn merchant_breakdown(
        txns: &[NormalizedTransaction],
        year_month: &str,
    ) -> Vec<(String, f64)> {
        let mut merchants: BTreeMap<&str, f64> = BTreeMap::new();
        for tx in txns.iter().filter(|t| t.year_month == year_month) {
            *merchants.entry(tx.merchant_name.as_str()).or_insert(0.0) += tx.amount_usd;
        }

        let mut out: Vec<(String, f64)> = merchants
            .into_iter()
            .map(|(name, total)| (name.to_string(), total))
            .collect();
        out.sort_by(|a, b| b.1.total_cmp(&a.1));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ledger_core::time::year_month;

    fn tx(
        day: (i32, u32, u32),
        tx_type: &str,
        status: &str,
        merchant: &str,
        amount: f64,
    ) -> NormalizedTransaction {
        let date = Utc.with_ymd_and_hms(day.0, day.1, day.2, 12, 0, 0).unwrap();
        NormalizedTransaction {
            year_month: year_month(&date),
            date,
            status: status.to_string(),
            tx_type: tx_type.to_string(),
            merchant_name: merchant.to_string(),
            amount_usd: amount,
            has_time: false,
        }
    }

    #[test]
    fn test_inclusion_predicate() {
        assert!(is_included(&tx((2024, 1, 1), "POS_TX", "APPROVED", "A", 1.0)));
        assert!(is_included(&tx((2024, 1, 1), "REFUND", "APPROVED", "A", -1.0)));
        assert!(!is_included(&tx((2024, 1, 1), "POS_TX", "DECLINED", "A", 1.0)));
        assert!(!is_included(&tx((2024, 1, 1), "FEE", "APPROVED", "A", 1.0)));
        assert!(!is_included(&tx((2024, 1, 1), "pos_tx", "APPROVED", "A", 1.0)));
        assert!(!is_included(&tx((2024, 1, 1), "REFUND", "approved", "A", -1.0)));
    }

    #[test]
    fn test_date_range_tracks_extremes() {
        let mut range = DateRange::default();
        assert_eq!(range.earliest, None);

        let mid = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        range.observe(mid);
        assert_eq!(range.earliest, Some(mid));
        assert_eq!(range.latest, Some(mid));

        range.observe(late);
        range.observe(early);
        assert_eq!(range.earliest, Some(early));
        assert_eq!(range.latest, Some(late));
    }

    #[test]
    fn test_month_totals_sorted_and_signed() {
        let txns = vec![
            tx((2024, 3, 2), "POS_TX", "APPROVED", "A", 5.0),
            tx((2024, 1, 5), "POS_TX", "APPROVED", "A", 100.0),
            tx((2024, 1, 9), "REFUND", "APPROVED", "A", -20.0),
            tx((2023, 12, 31), "POS_TX", "APPROVED", "B", 1.5),
        ];
        let totals = SpendAggregator::month_totals(&txns);
        let keys: Vec<&str> = totals.iter().map(|m| m.year_month.as_str()).collect();
        assert_eq!(keys, vec!["2023-12", "2024-01", "2024-03"]);
        assert_eq!(totals[1].total_usd, 80.0);
    }

    #[test]
    fn test_month_totals_empty() {
        assert!(SpendAggregator::month_totals(&[]).is_empty());
    }

    #[test]
    fn test_merchant_breakdown() {
        let txns = vec![
            tx((2024, 1, 5), "POS_TX", "APPROVED", "Grocer", 40.0),
            tx((2024, 1, 6), "POS_TX", "APPROVED", "Cafe", 4.0),
            tx((2024, 1, 7), "POS_TX", "APPROVED", "Grocer", 60.0),
            tx((2024, 1, 8), "REFUND", "APPROVED", "Grocer", -10.0),
            tx((2024, 2, 1), "POS_TX", "APPROVED", "Cafe", 500.0),
        ];
        let breakdown = SpendAggregator::merchant_breakdown(&txns, "2024-01");
        assert_eq!(
            breakdown,
            vec![("Grocer".to_string(), 90.0), ("Cafe".to_string(), 4.0)]
        );
    }
}
