//! Knobs for decoding and normalizing one input text.

use chrono_tz::Tz;

use crate::error::{LedgerError, Result};
use crate::time::parse_timezone;

/// Field separator used by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Guess from the first lines of the input, falling back to `,`.
    #[default]
    Auto,
    Fixed(u8),
}

impl Delimiter {
    /// Candidates tried by auto-detection, in tie-break order.
    pub const CANDIDATES: [u8; 4] = [b',', b'\t', b'|', b';'];

    /// Parse a setting value: `auto`, `tab`, `\t` or any single ASCII character.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "auto" | "" => Ok(Delimiter::Auto),
            "tab" | "\\t" | "\t" => Ok(Delimiter::Fixed(b'\t')),
            other => match other.as_bytes() {
                [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => {
                    Ok(Delimiter::Fixed(*b))
                }
                _ => Err(LedgerError::InvalidDelimiter(other.to_string())),
            },
        }
    }
}

/// Options for one parse. The default matches the plain entry point:
/// auto-detected delimiter and naive timestamps read as UTC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseOptions {
    pub delimiter: Delimiter,
    /// Zone used for date strings that carry no offset
    pub timezone: Tz,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Auto,
            timezone: Tz::UTC,
        }
    }
}

impl ParseOptions {
    /// Build options from textual settings (config file, CLI flags).
    pub fn from_settings(delimiter: &str, timezone: &str) -> Result<Self> {
        Ok(Self {
            delimiter: Delimiter::parse(delimiter)?,
            timezone: parse_timezone(timezone)?,
        })
    }
}
