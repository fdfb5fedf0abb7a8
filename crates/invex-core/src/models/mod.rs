//! Data models for extracted invoice records.

pub mod metadata;
pub mod row;

pub use metadata::InvoiceMetadata;
pub use row::LineItemRow;
