//! ledger-ingest: delimited-text decoding and row normalization for card exports.

pub mod decoder;
pub mod normalizer;

pub use decoder::{decode, CappedList, DecodeError, DecodeErrorCode, Decoded, MAX_DECODE_WARNINGS};
pub use normalizer::{normalize, RowWarning};
