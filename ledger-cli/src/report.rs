//! Plain-text rendering of a parse result.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::ValueEnum;
use ledger_core::format::{display_date, format_usd, month_label};
use ledger_core::{NormalizedTransaction, ParseResult};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    /// Oldest first
    #[default]
    Date,
    /// Largest spend first
    Amount,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub month: Option<String>,
    /// Case-insensitive substring of the merchant name
    pub merchant: Option<String>,
    pub sort: SortKey,
    pub limit: Option<usize>,
}

/// First `max` warnings plus an overflow line when some were held back.
pub fn truncate_warnings(warnings: &[String], max: usize) -> Vec<String> {
    let mut out: Vec<String> = warnings.iter().take(max).cloned().collect();
    if warnings.len() > max {
        out.push(format!("...and {} more warnings", warnings.len() - max));
    }
    out
}

fn day(dt: &DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format("%Y-%m-%d").to_string()
}

pub fn render_summary(result: &ParseResult, tz: Tz, max_warnings: usize) -> String {
    let s = &result.summary;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Rows: {} total, {} included, {} ignored",
        s.total_rows, s.included_rows, s.ignored_rows
    );
    match (&s.earliest, &s.latest) {
        (Some(first), Some(last)) => {
            let _ = writeln!(out, "Range: {} to {}", day(first, tz), day(last, tz));
        }
        _ => {
            let _ = writeln!(out, "Range: (no included transactions)");
        }
    }

    if !result.month_totals.is_empty() {
        let _ = writeln!(out, "\n{:<10} {:>14}", "Month", "Spend");
        for m in &result.month_totals {
            let _ = writeln!(
                out,
                "{:<10} {:>14}",
                month_label(&m.year_month),
                format_usd(m.total_usd)
            );
        }
        let _ = writeln!(out, "{:<10} {:>14}", "Net", format_usd(result.net_spend()));
    }

    if !s.warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings ({}):", s.warnings.len());
        for w in truncate_warnings(&s.warnings, max_warnings) {
            let _ = writeln!(out, "  - {w}");
        }
    }

    out
}

/// Apply month/merchant filters, sort and limit.
pub fn select_transactions<'a>(
    txns: &'a [NormalizedTransaction],
    query: &TransactionQuery,
) -> Vec<&'a NormalizedTransaction> {
    let merchant = query.merchant.as_ref().map(|m| m.to_lowercase());

    let mut selected: Vec<&NormalizedTransaction> = txns
        .iter()
        .filter(|t| query.month.as_ref().is_none_or(|m| &t.year_month == m))
        .filter(|t| {
            merchant
                .as_ref()
                .is_none_or(|m| t.merchant_name.to_lowercase().contains(m.as_str()))
        })
        .collect();

    match query.sort {
        SortKey::Date => selected.sort_by_key(|t| t.date),
        SortKey::Amount => selected.sort_by(|a, b| b.amount_usd.total_cmp(&a.amount_usd)),
    }

    if let Some(limit) = query.limit {
        selected.truncate(limit);
    }
    selected
}

pub fn render_transactions(txns: &[&NormalizedTransaction], tz: Tz) -> String {
    let mut out = String::new();
    for t in txns {
        let _ = writeln!(
            out,
            "{:<16}  {:<32}  {:<7}  {:>12}",
            display_date(t, tz),
            t.merchant_name,
            t.tx_type,
            format_usd(t.amount_usd)
        );
    }
    let _ = writeln!(out, "\n{} transactions", txns.len());
    out
}

pub fn render_breakdown(year_month: &str, merchants: &[(String, f64)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", month_label(year_month));
    if merchants.is_empty() {
        let _ = writeln!(out, "  (no transactions)");
        return out;
    }
    for (name, total) in merchants {
        let _ = writeln!(out, "  {:<32} {:>12}", name, format_usd(*total));
    }
    out
}
