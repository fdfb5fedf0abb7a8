//! Invoice extraction: metadata recovery and line-item table parsing.

mod engine;
mod metadata;
mod table;

pub use engine::{DocumentExtractor, Extraction};
pub use metadata::MetadataExtractor;
pub use table::{LineClass, LineItemTableParser};
