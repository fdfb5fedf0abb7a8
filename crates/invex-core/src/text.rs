//! Text normalization for layout-derived invoice text.
//!
//! Converted documents render tables with irregular runs of spaces and
//! non-breaking spaces; every structural matcher in this crate operates on
//! normalized text only.

/// Normalize a piece of extracted text.
///
/// Replaces non-breaking spaces with ordinary spaces, collapses every run of
/// whitespace to a single space and trims the ends. Total and idempotent.
pub fn normalize(s: &str) -> String {
    s.replace('\u{00a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
