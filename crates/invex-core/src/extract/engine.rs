//! Front door for per-document extraction.

use tracing::info;

use crate::document::Document;
use crate::error::ExtractionError;
use crate::models::{InvoiceMetadata, LineItemRow};

use super::{LineItemTableParser, MetadataExtractor};

/// Everything extracted from one document.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Invoice-level metadata; any field may be absent.
    pub metadata: InvoiceMetadata,
    /// Detail rows in document order, stamped with the metadata above.
    pub rows: Vec<LineItemRow>,
}

/// Stateless per-document extraction engine.
///
/// Each call processes one document independently and performs no I/O, so
/// documents can be processed by any concurrency model the host chooses. The
/// engine never retries: every failure is a single typed
/// [`ExtractionError`] the caller maps to a per-document failure bucket.
pub struct DocumentExtractor {
    metadata: MetadataExtractor,
    table: LineItemTableParser,
}

impl DocumentExtractor {
    pub fn new() -> Self {
        Self {
            metadata: MetadataExtractor::new(),
            table: LineItemTableParser::new(),
        }
    }

    /// Extract from converted HTML. Blank input, or input yielding no
    /// paragraph blocks, is `CONVERSION_EMPTY_CONTENT`.
    pub fn extract_html(&self, html: &str) -> Result<Extraction, ExtractionError> {
        if html.trim().is_empty() {
            return Err(ExtractionError::ConversionEmptyContent);
        }
        self.extract_document(&Document::from_html(html))
    }

    /// Extract from plain paragraph-structured text.
    pub fn extract_text(&self, text: &str) -> Result<Extraction, ExtractionError> {
        if text.trim().is_empty() {
            return Err(ExtractionError::ConversionEmptyContent);
        }
        self.extract_document(&Document::from_text(text))
    }

    /// Extract from an already-built document. Metadata is resolved once per
    /// document; zero grammar-matching lines is `PARSER_EMPTY_RESULT`.
    pub fn extract_document(&self, doc: &Document) -> Result<Extraction, ExtractionError> {
        if doc.is_empty() {
            return Err(ExtractionError::ConversionEmptyContent);
        }

        let metadata = self.metadata.extract(doc);
        let rows = self.table.parse(doc, &metadata);
        if rows.is_empty() {
            return Err(ExtractionError::ParserEmptyResult);
        }

        info!(
            rows = rows.len(),
            invoice_number = ?metadata.invoice_number,
            "document extraction complete"
        );
        Ok(Extraction { metadata, rows })
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const SAMPLE_HTML: &str = r#"<html><body>
        <p>Invoice</p>
        <p>Invoice # 1234567890<br/>Billing Cycle Date: JAN 15 2024<br/>Currency: USD</p>
        <p>Event Service Quantity/ Tax Total
Code Description Code UOM Amount Rate Charge Amount Charge</p>
        <p>EVT1 Network Access Fee SVC A 10 2.50 25.00 1.25 26.25
EVT2 Gateway Fee GW B 5 1.00 5.00 0.25 5.25
31.50</p>
    </body></html>"#;

    #[test]
    fn test_extract_html_end_to_end() {
        let out = DocumentExtractor::new().extract_html(SAMPLE_HTML).unwrap();

        assert_eq!(out.metadata.invoice_number, Some(1234567890));
        assert_eq!(
            out.metadata.billing_cycle_date,
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(out.metadata.currency, Some("USD".to_string()));

        // The banner and the trailing subtotal are filtered; both detail
        // rows survive in document order with the metadata stamped on.
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.rows[0].event_code, "EVT1");
        assert_eq!(out.rows[1].event_code, "EVT2");
        assert_eq!(out.rows[1].billing_cycle_date, Some("2024-01-15".to_string()));
    }

    #[test]
    fn test_empty_html_is_conversion_empty_content() {
        let err = DocumentExtractor::new().extract_html("   ").unwrap_err();
        assert_eq!(err.code(), "CONVERSION_EMPTY_CONTENT");
    }

    #[test]
    fn test_html_without_paragraphs_is_conversion_empty_content() {
        let err = DocumentExtractor::new()
            .extract_html("<html><body></body></html>")
            .unwrap_err();
        assert_eq!(err.code(), "CONVERSION_EMPTY_CONTENT");
    }

    #[test]
    fn test_no_matching_rows_is_parser_empty_result() {
        let err = DocumentExtractor::new()
            .extract_text("Invoice\n\nInvoice # 1234567890\n\nNo table in this document")
            .unwrap_err();
        assert_eq!(err.code(), "PARSER_EMPTY_RESULT");
    }

    #[test]
    fn test_rows_emitted_even_with_absent_metadata() {
        let out = DocumentExtractor::new()
            .extract_text("EVT1 Fee SVC A 1 1.00 1.00 0.00 1.00")
            .unwrap();
        assert_eq!(out.metadata, InvoiceMetadata::default());
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].invoice_number, None);
    }
}
