//! Delimited-text decoder.
//!
//! Turns an exported statement (header row + data rows) into [`RawRecord`]s
//! keyed by trimmed header name. Structural oddities never abort decoding;
//! they are collected as [`DecodeError`]s and the row is rebuilt as well as
//! the reader allows.

use std::fmt;

use csv::{ErrorKind, ReaderBuilder, StringRecord, Trim};
use ledger_core::{Delimiter, LedgerError, ParseOptions, RawRecord, Result};
use tracing::{debug, trace, warn};

/// Decode errors surfaced verbatim before the rest are summarised.
pub const MAX_DECODE_WARNINGS: usize = 10;

/// Lines sampled by delimiter auto-detection.
const DETECT_SAMPLE_LINES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorCode {
    TooFewFields,
    TooManyFields,
    MissingQuotes,
    UndetectableDelimiter,
    InvalidRecord,
}

impl DecodeErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TooFewFields => "TooFewFields",
            Self::TooManyFields => "TooManyFields",
            Self::MissingQuotes => "MissingQuotes",
            Self::UndetectableDelimiter => "UndetectableDelimiter",
            Self::InvalidRecord => "InvalidRecord",
        }
    }
}

impl fmt::Display for DecodeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal decoding anomaly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub code: DecodeErrorCode,
    pub message: String,
    /// 1-based source line where the offending record starts
    pub row: Option<usize>,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "{}: {} (row {})", self.code, self.message, row),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

/// Keeps the first `cap` items and counts the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CappedList<T> {
    items: Vec<T>,
    cap: usize,
    overflow: usize,
}

impl<T> CappedList<T> {
    pub fn new(cap: usize) -> Self {
        Self {
            items: Vec::with_capacity(cap),
            cap,
            overflow: 0,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.items.len() < self.cap {
            self.items.push(item);
        } else {
            self.overflow += 1;
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn overflow(&self) -> usize {
        self.overflow
    }

    pub fn total(&self) -> usize {
        self.items.len() + self.overflow
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Output of [`decode`].
#[derive(Debug, Clone)]
pub struct Decoded {
    /// Trimmed header names, empty when the input had no non-blank line
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
    pub errors: CappedList<DecodeError>,
    /// Separator actually used
    pub delimiter: u8,
}

impl Decoded {
    /// Decode anomalies rendered as warning lines, capped with an overflow line.
    pub fn warnings(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.errors.items().iter().map(|e| e.to_string()).collect();
        if self.errors.overflow() > 0 {
            lines.push(format!("...and {} more parse errors", self.errors.overflow()));
        }
        lines
    }
}

/// Decode delimited `text` into raw records.
///
/// The first non-blank line is the header row. Rows whose fields are all
/// blank are dropped. Only a reader failure that prevents reading the text at
/// all is returned as an error.
pub fn decode(text: &str, opts: &ParseOptions) -> Result<Decoded> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut errors = CappedList::new(MAX_DECODE_WARNINGS);

    let delimiter = match opts.delimiter {
        Delimiter::Fixed(d) => d,
        Delimiter::Auto => match detect_delimiter(text) {
            Some(d) => d,
            None => {
                if text.lines().any(|l| !l.trim().is_empty()) {
                    errors.push(DecodeError {
                        code: DecodeErrorCode::UndetectableDelimiter,
                        message: "Unable to auto-detect delimiting character; defaulted to ','"
                            .to_string(),
                        row: None,
                    });
                }
                b','
            }
        },
    };

    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(text.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut records = Vec::new();
    let mut blank_rows = 0usize;

    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                let row = e.position().map(|p| p.line() as usize);
                if let ErrorKind::Io(io) = e.kind() {
                    warn!("delimited text reader failed: {io}");
                    return Err(LedgerError::Decode(io.to_string()));
                }
                trace!("skipping unreadable record at {row:?}: {e}");
                errors.push(DecodeError {
                    code: DecodeErrorCode::InvalidRecord,
                    message: e.to_string(),
                    row,
                });
                continue;
            }
        };

        let row = record.position().map(|p| p.line() as usize);

        if is_blank(&record) {
            blank_rows += 1;
            continue;
        }

        let Some(header) = headers.as_ref() else {
            headers = Some(record.iter().map(|h| h.trim().to_string()).collect());
            continue;
        };

        if record.len() != header.len() {
            let (code, label) = if record.len() < header.len() {
                (DecodeErrorCode::TooFewFields, "Too few fields")
            } else {
                (DecodeErrorCode::TooManyFields, "Too many fields")
            };
            errors.push(DecodeError {
                code,
                message: format!(
                    "{label}: expected {} fields but parsed {}",
                    header.len(),
                    record.len()
                ),
                row,
            });
        }

        records.push(RawRecord::from_pairs(
            header.iter().cloned().zip(record.iter().map(str::to_string)),
        ));
    }

    if let Some(row) = unterminated_quote_line(text, delimiter) {
        errors.push(DecodeError {
            code: DecodeErrorCode::MissingQuotes,
            message: "Quoted field unterminated".to_string(),
            row: Some(row),
        });
    }

    debug!(
        records = records.len(),
        blank_rows,
        errors = errors.total(),
        delimiter = %char::from(delimiter).escape_default(),
        "decoded delimited text"
    );

    Ok(Decoded {
        headers: headers.unwrap_or_default(),
        records,
        errors,
        delimiter,
    })
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|f| f.trim().is_empty())
}

/// Quote tracking that follows the reader's rules: only a quote opening a
/// field starts a quoted field, and `""` inside one is an escaped quote. A
/// quote anywhere else is a literal character.
struct QuoteScanner {
    delimiter: u8,
    in_quotes: bool,
    field_start: bool,
    /// Saw a quote inside a quoted field; the next byte decides close or escape
    closing: bool,
}

impl QuoteScanner {
    fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            in_quotes: false,
            field_start: true,
            closing: false,
        }
    }

    /// Feed one byte. Returns `true` when it is a delimiter outside quotes.
    fn feed(&mut self, b: u8) -> bool {
        if self.closing {
            self.closing = false;
            if b == b'"' {
                return false;
            }
            self.in_quotes = false;
        }
        if self.in_quotes {
            self.closing = b == b'"';
            return false;
        }
        match b {
            b'"' if self.field_start => {
                self.in_quotes = true;
                self.field_start = false;
                false
            }
            b'\n' | b'\r' => {
                self.field_start = true;
                false
            }
            _ if b == self.delimiter => {
                self.field_start = true;
                true
            }
            _ => {
                self.field_start = false;
                false
            }
        }
    }

    fn is_open(&self) -> bool {
        self.in_quotes && !self.closing
    }
}

/// 1-based line where a quoted field opened and never closed.
fn unterminated_quote_line(text: &str, delimiter: u8) -> Option<usize> {
    let mut scanner = QuoteScanner::new(delimiter);
    let mut line = 1;
    let mut opened_at = line;
    for b in text.bytes() {
        let was_open = scanner.in_quotes;
        scanner.feed(b);
        if !was_open && scanner.in_quotes {
            opened_at = line;
        }
        if b == b'\n' {
            line += 1;
        }
    }
    scanner.is_open().then_some(opened_at)
}

/// Pick the candidate delimiter whose field count is steadiest over the first
/// non-blank lines, preferring more fields on ties. `None` when no candidate
/// splits the header line.
pub fn detect_delimiter(text: &str) -> Option<u8> {
    let sample: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(DETECT_SAMPLE_LINES)
        .collect();
    if sample.is_empty() {
        return None;
    }

    let mut best: Option<(u8, usize, usize)> = None;
    for &candidate in Delimiter::CANDIDATES.iter() {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| count_unquoted(line, candidate) + 1)
            .collect();
        if counts[0] < 2 {
            continue;
        }
        let delta: usize = counts.windows(2).map(|w| w[0].abs_diff(w[1])).sum();
        let fields = counts[0];
        let better = match best {
            None => true,
            Some((_, best_delta, best_fields)) => {
                delta < best_delta || (delta == best_delta && fields > best_fields)
            }
        };
        if better {
            best = Some((candidate, delta, fields));
        }
    }
    best.map(|(d, _, _)| d)
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut scanner = QuoteScanner::new(delimiter);
    line.bytes().filter(|&b| scanner.feed(b)).count()
}
