//! Core library for invoice document extraction.
//!
//! This crate provides:
//! - Text normalization for layout-derived invoice text
//! - Paragraph-structured document ingestion (converted HTML or plain text)
//! - Invoice metadata recovery (number, billing cycle date, currency) via
//!   layered pattern matching with document-wide fallback
//! - Line-item table reconstruction with noise filtering
//! - A fuzzy-similarity matching primitive for catalog reconciliation
//!
//! The engine is purely computational and stateless: it reads an
//! already-materialized text blob per document and performs no I/O of its
//! own. Remote drives, conversion services, dedup indexes and object storage
//! are the orchestrating caller's concern.

pub mod document;
pub mod error;
pub mod extract;
pub mod fuzzy;
pub mod models;
pub mod patterns;
pub mod text;

pub use document::{Document, Paragraph};
pub use error::{ExtractionError, InvexError, Result};
pub use extract::{DocumentExtractor, Extraction, LineClass, LineItemTableParser, MetadataExtractor};
pub use models::{InvoiceMetadata, LineItemRow};
pub use patterns::{PatternLibrary, PATTERNS};
pub use text::normalize;
