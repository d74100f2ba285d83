//! ledger-finance: inclusion filtering, monthly aggregation and the one-shot
//! export-to-summary pipeline.

pub mod aggregator;
pub mod pipeline;

pub use aggregator::{DateRange, SpendAggregator, is_included};
pub use pipeline::{compute_monthly_spend_from_csv_text, compute_monthly_spend_with_options};
