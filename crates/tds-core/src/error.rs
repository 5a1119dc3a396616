//! Error types for the tds-core library.

use thiserror::Error;

use crate::models::record::ExtractionError;

/// Main error type for the tds library.
#[derive(Error, Debug)]
pub enum TdsError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An exported table lacks one of the expected columns.
    #[error("missing column in table: {0}")]
    MissingColumn(String),

    /// The walk finished but no PDF produced a record.
    ///
    /// Carries the per-file errors collected along the way so callers can
    /// still report them.
    #[error("no data could be extracted ({} file errors)", errors.len())]
    EmptyBatch { errors: Vec<ExtractionError> },
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The file exceeds the configured size limit.
    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },
}

/// Result type for the tds library.
pub type Result<T> = std::result::Result<T, TdsError>;
