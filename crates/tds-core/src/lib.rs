//! Core library for TDS statement extraction.
//!
//! This crate provides:
//! - PDF text access (lopdf, with pdf-extract as a second engine)
//! - Rule-chain field extraction (deductee PAN, amount paid, tax deducted)
//! - Deal folder aggregation into a batch of records and per-file errors
//! - Four-column CSV export and a post-hoc record validator

pub mod aggregate;
pub mod error;
pub mod models;
pub mod pdf;
pub mod statement;
pub mod table;
pub mod validation;

pub use aggregate::{DealAggregator, DealFolder, DiscoveredPdf, Discovery, DocumentSource, PdfFileSource};
pub use error::{PdfError, Result, TdsError};
pub use models::config::{ColumnNames, TdsConfig};
pub use models::record::{Batch, ExtractionError, ExtractionRecord, FileOutcome};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use statement::{StatementFields, StatementParser};
pub use table::TableRow;
pub use validation::{RecordValidator, RowReport, ValidationFlag, ValidationReport};
