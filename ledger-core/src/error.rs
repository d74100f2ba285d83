//! Error type shared by the ledger crates.

use thiserror::Error;

/// Failures that stop a whole input from being processed.
///
/// Row-level problems never surface here; they become warning strings on the
/// parse summary instead.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The decoder could not process the text at all.
    #[error("could not decode delimited text: {0}")]
    Decode(String),

    /// An IANA time zone name did not resolve.
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A delimiter setting was neither `auto` nor a single ASCII character.
    #[error("invalid delimiter: {0:?}")]
    InvalidDelimiter(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
