//! Error types for the invex-core library.

use thiserror::Error;

/// Failures the extraction engine can raise.
///
/// Each variant carries a stable machine-readable code so callers can bucket
/// per-document failures without string matching. Missing metadata fields are
/// never an error (see [`crate::models::InvoiceMetadata`]); only malformed or
/// empty input and an empty parse result raise.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The document conversion step succeeded but produced no text.
    #[error("conversion produced no content")]
    ConversionEmptyContent,

    /// The document conversion step itself failed.
    #[error("conversion failed: {0}")]
    ConversionFailure(String),

    /// The source document reference does not resolve to readable content.
    #[error("input not found: {0}")]
    InputMissing(String),

    /// Conversion succeeded but zero lines matched the row grammar.
    #[error("no detail rows matched")]
    ParserEmptyResult,
}

impl ExtractionError {
    /// Machine-readable failure code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConversionEmptyContent => "CONVERSION_EMPTY_CONTENT",
            Self::ConversionFailure(_) => "CONVERSION_FAILURE",
            Self::InputMissing(_) => "INPUT_MISSING",
            Self::ParserEmptyResult => "PARSER_EMPTY_RESULT",
        }
    }
}

/// Main error type for the invex library.
#[derive(Error, Debug)]
pub enum InvexError {
    /// Document extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for the invex library.
pub type Result<T> = std::result::Result<T, InvexError>;
