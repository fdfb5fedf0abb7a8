//! Compiled matching rules for invoice extraction.
//!
//! All rules live in one immutable [`PatternLibrary`] compiled once at first
//! use; extractors capture a reference to the shared instance instead of
//! recompiling per document.

use lazy_static::lazy_static;
use regex::Regex;

use crate::text::normalize;

/// Numeric token: optional sign, comma-grouped digits, optional fraction.
const NUM: &str = r"-?[\d,]+(?:\.\d+)?";

/// Column-title phrases identifying the detail table's repeated header line.
/// A line is a header banner only if it contains both.
pub const HEADER_SIGNATURE_PARTS: [&str; 2] = [
    "Event Service Quantity/ Tax Total",
    "Code Description Code UOM Amount Rate Charge Amount Charge",
];

/// The set of compiled matching rules.
pub struct PatternLibrary {
    /// Full-line detail row grammar, anchored at both ends.
    pub row: Regex,
    /// A line consisting solely of one numeric token (subtotal filter).
    pub only_number: Regex,
    /// Labeled invoice number: "Invoice", optional `#`/`No.`/`Number`, colon.
    pub invoice_field: Regex,
    /// Unlabeled fallback: any long run of digits with embedded spaces/hyphens.
    pub invoice_digits: Regex,
    /// "Billing Cycle Date: MON DD YYYY".
    pub billing_date: Regex,
    /// "Currency: CCC".
    pub currency: Regex,
}

impl PatternLibrary {
    pub fn new() -> Self {
        Self {
            row: Regex::new(&format!(
                r"(?x)^
                (?P<event_code>[A-Z0-9]+)\s+
                (?P<description>.*?)\s+
                (?P<service_code>[A-Z0-9]{{1,4}})\s+
                (?P<uom>[A-Z])\s+
                (?P<qty>{NUM})\s+
                (?P<rate>{NUM})\s+
                (?P<charge>{NUM})\s+
                (?P<tax>{NUM})\s+
                (?P<total>{NUM})
                $"
            ))
            .unwrap(),
            only_number: Regex::new(&format!("^{NUM}$")).unwrap(),
            invoice_field: Regex::new(r"(?i)(?:Invoice\s*(?:#|No\.?|Number)?\s*:?\s*)(\d[\d\-]{9,})")
                .unwrap(),
            invoice_digits: Regex::new(r"(\d[\d\s\-]{8,})").unwrap(),
            billing_date: Regex::new(
                r"(?i)Billing\s*Cycle\s*Date\s*:\s*([A-Z]{3})\s+(\d{1,2})\s+(\d{4})",
            )
            .unwrap(),
            currency: Regex::new(r"(?i)Currency\s*:\s*([A-Z]{3})").unwrap(),
        }
    }

    /// Whether a line is a subtotal line (a single numeric token and nothing
    /// else). Subtotal lines must never be matched as detail rows.
    pub fn is_subtotal_line(&self, line: &str) -> bool {
        self.only_number.is_match(line.trim())
    }

    /// Whether a line is the detail table's repeated column-title banner.
    pub fn is_header_banner(&self, text: &str) -> bool {
        let t = normalize(text);
        HEADER_SIGNATURE_PARTS.iter().all(|sig| t.contains(sig))
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a three-letter month abbreviation (uppercase) to its number.
pub fn month_number(abbr: &str) -> Option<u32> {
    match abbr {
        "JAN" => Some(1),
        "FEB" => Some(2),
        "MAR" => Some(3),
        "APR" => Some(4),
        "MAY" => Some(5),
        "JUN" => Some(6),
        "JUL" => Some(7),
        "AUG" => Some(8),
        "SEP" => Some(9),
        "OCT" => Some(10),
        "NOV" => Some(11),
        "DEC" => Some(12),
        _ => None,
    }
}

lazy_static! {
    /// Shared pattern library, compiled once per process.
    pub static ref PATTERNS: PatternLibrary = PatternLibrary::new();
}
