//! Invoice metadata recovery via layered pattern matching.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::document::Document;
use crate::models::InvoiceMetadata;
use crate::patterns::{month_number, PatternLibrary, PATTERNS};
use crate::text::normalize;

/// Recovers invoice number, billing cycle date and currency from a document.
///
/// Fields are resolved independently, first match wins, over an ordered list
/// of search scopes: the paragraph whose normalized text is exactly
/// "invoice", the paragraph immediately after it, then the whole document.
/// A field unresolved after all scopes stays `None`; that is a recoverable
/// condition, never an error.
pub struct MetadataExtractor {
    patterns: &'static PatternLibrary,
}

impl MetadataExtractor {
    pub fn new() -> Self {
        Self { patterns: &PATTERNS }
    }

    pub fn extract(&self, doc: &Document) -> InvoiceMetadata {
        let scopes = self.search_scopes(doc);

        let mut meta = InvoiceMetadata::default();
        for scope in &scopes {
            if meta.invoice_number.is_none() {
                meta.invoice_number = self.grab_number(scope);
            }
            if meta.billing_cycle_date.is_none() {
                meta.billing_cycle_date = self.grab_billing_date(scope);
            }
            if meta.currency.is_none() {
                meta.currency = self.grab_currency(scope);
            }
        }

        if meta.invoice_number.is_none() {
            warn!("no 'Invoice # <number>' found in document");
        }
        if meta.billing_cycle_date.is_none() {
            warn!("no 'Billing Cycle Date: <MON DD YYYY>' found in document");
        }
        if meta.currency.is_none() {
            warn!("no 'Currency: <CCC>' found in document");
        }

        meta
    }

    /// Anchored scopes first (the "invoice" heading paragraph, then the one
    /// right after it), then the whole document as fallback.
    fn search_scopes(&self, doc: &Document) -> Vec<String> {
        let mut scopes = Vec::with_capacity(3);

        let anchor = doc
            .paragraphs
            .iter()
            .position(|p| normalize(&p.text).eq_ignore_ascii_case("invoice"));

        if let Some(i) = anchor {
            debug!(paragraph = i, "anchored metadata search at 'invoice' heading");
            scopes.push(doc.paragraphs[i].text.clone());
            if let Some(next) = doc.paragraphs.get(i + 1) {
                scopes.push(next.text.clone());
            }
        }

        scopes.push(doc.full_text());
        scopes
    }

    /// Labeled invoice-number pattern first; then any long digit run with
    /// embedded spaces/hyphens. All non-digits are stripped before parsing.
    fn grab_number(&self, text: &str) -> Option<i64> {
        if let Some(caps) = self.patterns.invoice_field.captures(text) {
            if let Some(n) = parse_digits(&caps[1]) {
                return Some(n);
            }
        }
        self.patterns
            .invoice_digits
            .captures(text)
            .and_then(|caps| parse_digits(&caps[1]))
    }

    /// "Billing Cycle Date: MON DD YYYY". A recognized label with an invalid
    /// calendar date (e.g. FEB 30) resolves to `None` rather than raising.
    fn grab_billing_date(&self, text: &str) -> Option<NaiveDate> {
        let caps = self.patterns.billing_date.captures(text)?;
        let month = month_number(&caps[1].to_uppercase())?;
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    fn grab_currency(&self, text: &str) -> Option<String> {
        self.patterns
            .currency
            .captures(text)
            .map(|caps| caps[1].to_uppercase())
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_digits(s: &str) -> Option<i64> {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
