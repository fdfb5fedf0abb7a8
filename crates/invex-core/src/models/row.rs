//! Structured line-item detail rows.

use serde::Serialize;

use super::InvoiceMetadata;

/// One detail row extracted from an invoice's itemized table.
///
/// A row is only constructed from a line matching the full row grammar;
/// partially-matching lines are discarded, never partially populated. Each
/// row carries a denormalized copy of the enclosing document's metadata so it
/// can stand alone as a row-oriented output record (one JSON object per row).
/// Rows are immutable once emitted; the orchestrating caller appends
/// provenance fields (source file id, processing timestamp) on its own side.
#[derive(Debug, Clone, Serialize)]
pub struct LineItemRow {
    /// Enclosing document's invoice number.
    pub invoice_number: Option<i64>,
    /// Enclosing document's billing cycle date, ISO-8601, or null.
    pub billing_cycle_date: Option<String>,
    /// Enclosing document's currency code.
    pub currency: Option<String>,

    /// Event code, alphanumeric, no interior whitespace.
    pub event_code: String,
    /// Free-text description between event code and service code.
    pub description: String,
    /// Service code, 1-4 alphanumeric characters.
    pub service_code: String,
    /// Unit of measure, a single uppercase letter.
    pub uom: String,

    pub quantity_amount: f64,
    pub rate: f64,
    pub charge: f64,
    pub tax_amount: f64,
    pub total_charge: f64,

    /// Numeric captures that failed to parse and degraded to 0.0. Internal
    /// marker only; the serialized record keeps its original shape.
    #[serde(skip)]
    pub degraded_fields: Vec<&'static str>,
}

impl LineItemRow {
    /// Whether any numeric field degraded to 0.0 on a parse failure, as
    /// opposed to a genuine zero amount.
    pub fn is_degraded(&self) -> bool {
        !self.degraded_fields.is_empty()
    }
}

/// Helper used by the table parser to stamp rows with document metadata.
pub(crate) fn metadata_stamp(meta: &InvoiceMetadata) -> (Option<i64>, Option<String>, Option<String>) {
    (
        meta.invoice_number,
        meta.billing_cycle_iso(),
        meta.currency.clone(),
    )
}
