//! One-shot transformation from export text to a [`ParseResult`].

use ledger_core::{ParseOptions, ParseResult, ParseSummary, Result};
use ledger_ingest::{decode, normalize};
use tracing::{debug, trace};

use crate::aggregator::{DateRange, SpendAggregator, is_included};

/// Decode, normalize, filter and aggregate `text` with default options.
///
/// Fails only when the text cannot be decoded at all. Row-level problems
/// become warnings on the summary.
pub fn compute_monthly_spend_from_csv_text(text: &str) -> Result<ParseResult> {
    compute_monthly_spend_with_options(text, &ParseOptions::default())
}

/// Same as [`compute_monthly_spend_from_csv_text`] with explicit options.
pub fn compute_monthly_spend_with_options(text: &str, opts: &ParseOptions) -> Result<ParseResult> {
    let decoded = decode(text, opts)?;

    // Decode anomalies first, then row warnings in input order.
    let mut warnings = decoded.warnings();
    let total_rows = decoded.records.len();
    let mut transactions = Vec::new();
    let mut range = DateRange::default();

    for (index, record) in decoded.records.iter().enumerate() {
        match normalize(record, opts) {
            Ok(tx) if is_included(&tx) => {
                range.observe(tx.date);
                transactions.push(tx);
            }
            Ok(tx) => {
                trace!(
                    record = index + 1,
                    status = %tx.status,
                    tx_type = %tx.tx_type,
                    "row not counted"
                );
            }
            Err(warning) => {
                trace!(record = index + 1, %warning, "row rejected");
                warnings.push(warning.to_string());
            }
        }
    }

    let month_totals = SpendAggregator::month_totals(&transactions);
    let included_rows = transactions.len();

    debug!(
        total_rows,
        included_rows,
        months = month_totals.len(),
        warnings = warnings.len(),
        "computed monthly spend"
    );

    Ok(ParseResult {
        summary: ParseSummary {
            total_rows,
            included_rows,
            ignored_rows: total_rows - included_rows,
            earliest: range.earliest,
            latest: range.latest,
            warnings,
        },
        month_totals,
        transactions,
    })
}
