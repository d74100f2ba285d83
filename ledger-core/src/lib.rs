//! ledger-core: transaction data model, parse options and date utilities for the ledger normalizer

pub mod error;
pub mod format;
pub mod ledger;
pub mod options;
pub mod time;

pub use error::{LedgerError, Result};
pub use ledger::{
    APPROVED_STATUS, MonthTotal, NormalizedTransaction, PURCHASE_TYPE, ParseResult, ParseSummary,
    REFUND_TYPE, RawRecord, UNKNOWN_MERCHANT,
};
pub use options::{Delimiter, ParseOptions};
