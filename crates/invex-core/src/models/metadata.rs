//! Invoice-level metadata recovered from a document.

use chrono::NaiveDate;
use serde::Serialize;

/// Metadata recovered from one invoice document.
///
/// All three fields are independently optional: a document may yield partial
/// metadata, and "not found" stays distinguishable from any default. Callers
/// that use these fields for deduplication or partitioning must check for
/// absence explicitly before relying on them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceMetadata {
    /// Digits-only numeric invoice identifier.
    pub invoice_number: Option<i64>,

    /// Date identifying the invoicing period.
    pub billing_cycle_date: Option<NaiveDate>,

    /// Three-letter currency code, uppercase.
    pub currency: Option<String>,
}

impl InvoiceMetadata {
    /// Billing cycle date as an ISO-8601 string, for denormalized row output.
    pub fn billing_cycle_iso(&self) -> Option<String> {
        self.billing_cycle_date.map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// Whether every field was resolved.
    pub fn is_complete(&self) -> bool {
        self.invoice_number.is_some()
            && self.billing_cycle_date.is_some()
            && self.currency.is_some()
    }

    /// Names of the fields that could not be resolved.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.invoice_number.is_none() {
            missing.push("invoice_number");
        }
        if self.billing_cycle_date.is_none() {
            missing.push("billing_cycle_date");
        }
        if self.currency.is_none() {
            missing.push("currency");
        }
        missing
    }
}
