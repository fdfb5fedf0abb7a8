//! Line-item table reconstruction from paragraph text.
//!
//! This is a line classifier, not a layout parser: conversion preserves each
//! logical table row as one line inside a paragraph block, so every
//! normalized line is matched against the full row grammar. Table noise
//! (subtotal lines, header banners, footer totals) frequently shares a
//! numeric suffix with real rows, which is why the grammar is anchored at
//! both ends and partial matches are rejected outright.

use regex::Captures;
use tracing::{debug, trace};

use crate::document::Document;
use crate::models::row::metadata_stamp;
use crate::models::{InvoiceMetadata, LineItemRow};
use crate::patterns::{PatternLibrary, PATTERNS};
use crate::text::normalize;

/// Classification of one normalized table line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Matches the full row grammar; yields a detail row.
    Detail,
    /// A single numeric token; a running or final total, never a row.
    Subtotal,
    /// The repeated column-title line of the itemized table.
    HeaderBanner,
    /// Anything else.
    Noise,
}

/// [`LineClass`] with the row-grammar captures attached to detail lines.
enum Classified<'a> {
    Detail(Captures<'a>),
    Subtotal,
    HeaderBanner,
    Noise,
}

/// Emits structured detail rows from a document's paragraphs, in document
/// order, stamped with the document's already-resolved metadata.
pub struct LineItemTableParser {
    patterns: &'static PatternLibrary,
}

impl LineItemTableParser {
    pub fn new() -> Self {
        Self { patterns: &PATTERNS }
    }

    /// Classify one normalized line. Exposed for triage tooling; `parse`
    /// applies the same classification.
    pub fn classify_line(&self, line: &str) -> LineClass {
        match self.classify(line) {
            Classified::HeaderBanner => LineClass::HeaderBanner,
            Classified::Subtotal => LineClass::Subtotal,
            Classified::Detail(_) => LineClass::Detail,
            Classified::Noise => LineClass::Noise,
        }
    }

    /// Single-pass classification carrying the grammar captures for detail
    /// lines, so a row is never matched twice.
    fn classify<'a>(&self, line: &'a str) -> Classified<'a> {
        if self.patterns.is_header_banner(line) {
            Classified::HeaderBanner
        } else if self.patterns.is_subtotal_line(line) {
            Classified::Subtotal
        } else if let Some(caps) = self.patterns.row.captures(line) {
            Classified::Detail(caps)
        } else {
            Classified::Noise
        }
    }

    /// Walk the document's paragraphs in order and emit one row per line
    /// matching the row grammar. Output order mirrors document order;
    /// downstream consumers treat it as presentation order.
    pub fn parse(&self, doc: &Document, meta: &InvoiceMetadata) -> Vec<LineItemRow> {
        let mut rows = Vec::new();

        for paragraph in &doc.paragraphs {
            for raw_line in paragraph.lines() {
                let line = normalize(raw_line);
                if line.is_empty() {
                    continue;
                }
                match self.classify(&line) {
                    Classified::HeaderBanner => {
                        trace!("skipping header banner");
                    }
                    Classified::Subtotal => {
                        trace!(line = %line, "skipping subtotal line");
                    }
                    Classified::Noise => {}
                    Classified::Detail(caps) => {
                        rows.push(self.build_row(&caps, meta));
                    }
                }
            }
        }

        debug!(rows = rows.len(), "table parse complete");
        rows
    }

    fn build_row(&self, caps: &Captures<'_>, meta: &InvoiceMetadata) -> LineItemRow {
        let (invoice_number, billing_cycle_date, currency) = metadata_stamp(meta);
        let mut degraded = Vec::new();

        let quantity_amount = to_amount(caps, "qty", "quantity_amount", &mut degraded);
        let rate = to_amount(caps, "rate", "rate", &mut degraded);
        let charge = to_amount(caps, "charge", "charge", &mut degraded);
        let tax_amount = to_amount(caps, "tax", "tax_amount", &mut degraded);
        let total_charge = to_amount(caps, "total", "total_charge", &mut degraded);

        LineItemRow {
            invoice_number,
            billing_cycle_date,
            currency,
            event_code: caps["event_code"].to_string(),
            description: caps["description"].to_string(),
            service_code: caps["service_code"].to_string(),
            uom: caps["uom"].to_string(),
            quantity_amount,
            rate,
            charge,
            tax_amount,
            total_charge,
            degraded_fields: degraded,
        }
    }
}

impl Default for LineItemTableParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one numeric capture: commas stripped, then f64. The grammar should
/// make failure impossible, but a capture that still fails to parse degrades
/// to 0.0 with the field recorded, so a row with one corrupt amount keeps its
/// identifying fields instead of being discarded.
fn to_amount(
    caps: &Captures<'_>,
    group: &str,
    field: &'static str,
    degraded: &mut Vec<&'static str>,
) -> f64 {
    let raw = caps.name(group).map(|m| m.as_str()).unwrap_or("");
    match raw.replace(',', "").parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            degraded.push(field);
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn meta() -> InvoiceMetadata {
        InvoiceMetadata {
            invoice_number: Some(1234567890),
            billing_cycle_date: NaiveDate::from_ymd_opt(2024, 1, 15),
            currency: Some("USD".to_string()),
        }
    }

    #[test]
    fn test_emits_row_from_grammar_match() {
        let doc = Document::from_text("EVT1 Network Access Fee SVC A 10 2.50 25.00 1.25 26.25");
        let rows = LineItemTableParser::new().parse(&doc, &meta());

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.event_code, "EVT1");
        assert_eq!(row.description, "Network Access Fee");
        assert_eq!(row.service_code, "SVC");
        assert_eq!(row.uom, "A");
        assert_eq!(row.quantity_amount, 10.0);
        assert_eq!(row.rate, 2.5);
        assert_eq!(row.charge, 25.0);
        assert_eq!(row.tax_amount, 1.25);
        assert_eq!(row.total_charge, 26.25);
        assert_eq!(row.invoice_number, Some(1234567890));
        assert_eq!(row.billing_cycle_date, Some("2024-01-15".to_string()));
        assert_eq!(row.currency, Some("USD".to_string()));
        assert!(!row.is_degraded());
    }

    #[test]
    fn test_subtotal_line_never_produces_row() {
        let doc = Document::from_text("1234.56");
        let rows = LineItemTableParser::new().parse(&doc, &meta());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_header_banner_skipped() {
        // The banner contains numeric-looking tokens, but both signature
        // phrases mark it as a column-title line.
        let doc = Document::from_text(
            "Event Service Quantity/ Tax Total Code Description Code UOM Amount Rate Charge Amount Charge",
        );
        let rows = LineItemTableParser::new().parse(&doc, &meta());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_partial_match_rejected_not_salvaged() {
        // Numeric tail of a real row, but missing the leading code fields.
        let doc = Document::from_text("Grand Total 10 2.50 25.00 1.25 26.25");
        let rows = LineItemTableParser::new().parse(&doc, &meta());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_row_order_mirrors_document_order() {
        let doc = Document::from_text(
            "EVT1 First SVC A 1 1.00 1.00 0.00 1.00\n\
             123.45\n\
             EVT2 Second SVC B 2 2.00 4.00 0.00 4.00\n\
             \n\
             EVT3 Third SVC C 3 3.00 9.00 0.00 9.00",
        );
        let rows = LineItemTableParser::new().parse(&doc, &meta());
        let codes: Vec<_> = rows.iter().map(|r| r.event_code.as_str()).collect();
        assert_eq!(codes, vec!["EVT1", "EVT2", "EVT3"]);
    }

    #[test]
    fn test_comma_grouped_amounts() {
        let doc = Document::from_text("EVT9 Bulk Charges SVC U 1,000 0.10 1,000.00 -50.00 950.00");
        let rows = LineItemTableParser::new().parse(&doc, &meta());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity_amount, 1000.0);
        assert_eq!(rows[0].charge, 1000.0);
        assert_eq!(rows[0].tax_amount, -50.0);
    }

    #[test]
    fn test_irregular_whitespace_normalized_before_matching() {
        let doc =
            Document::from_text("EVT1\u{00a0}\u{00a0}Network  Access Fee   SVC  A  10 2.50 25.00 1.25 26.25");
        let rows = LineItemTableParser::new().parse(&doc, &meta());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Network Access Fee");
    }

    #[test]
    fn test_degraded_amount_keeps_row() {
        // ",," survives the NUM token class but fails the f64 parse once the
        // commas are stripped; the row is kept with the field zeroed.
        let doc = Document::from_text("EVT1 Odd Line SVC A ,, 2.50 25.00 1.25 26.25");
        let rows = LineItemTableParser::new().parse(&doc, &meta());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity_amount, 0.0);
        assert_eq!(rows[0].degraded_fields, vec!["quantity_amount"]);
    }

    #[test]
    fn test_absent_metadata_stamped_as_none() {
        let doc = Document::from_text("EVT1 Fee SVC A 1 1.00 1.00 0.00 1.00");
        let rows = LineItemTableParser::new().parse(&doc, &InvoiceMetadata::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].invoice_number, None);
        assert_eq!(rows[0].billing_cycle_date, None);
        assert_eq!(rows[0].currency, None);
    }

    #[test]
    fn test_classification_agrees_with_row_emission() {
        // `classify_line` and `parse` share one classification pass; a line
        // classified as detail yields exactly one row, anything else none.
        let parser = LineItemTableParser::new();
        let lines = [
            ("EVT1 Fee SVC A 1 1.00 1.00 0.00 1.00", LineClass::Detail),
            ("42.00", LineClass::Subtotal),
            ("Page 3 of 12", LineClass::Noise),
        ];
        for (line, class) in lines {
            assert_eq!(parser.classify_line(line), class);
            let rows = parser.parse(&Document::from_text(line), &meta());
            assert_eq!(rows.len(), usize::from(class == LineClass::Detail));
        }
    }

    #[test]
    fn test_classify_line() {
        let parser = LineItemTableParser::new();
        assert_eq!(
            parser.classify_line("EVT1 Fee SVC A 1 1.00 1.00 0.00 1.00"),
            LineClass::Detail
        );
        assert_eq!(parser.classify_line("1234.56"), LineClass::Subtotal);
        assert_eq!(parser.classify_line("Page 3 of 12"), LineClass::Noise);
    }
}
