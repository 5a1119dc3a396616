//! Extraction records and batches produced by a deal aggregation run.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fields extracted from a single TDS statement PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// PAN of the deductee (5 letters, 4 digits, 1 letter).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deductee_id: Option<String>,

    /// Total amount paid or credited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount_paid: Option<Decimal>,

    /// Total tax deducted at source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tax_deducted: Option<Decimal>,

    /// Name of the folder the PDF was found in.
    pub deal_name: String,

    /// Path of the PDF relative to the scanned root.
    pub source_path: PathBuf,
}

impl ExtractionRecord {
    /// Whether none of the three statement fields could be resolved.
    pub fn is_blank(&self) -> bool {
        self.deductee_id.is_none()
            && self.total_amount_paid.is_none()
            && self.total_tax_deducted.is_none()
    }

    /// Names of the fields left unresolved.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.deductee_id.is_none() {
            missing.push("deductee_id");
        }
        if self.total_amount_paid.is_none() {
            missing.push("total_amount_paid");
        }
        if self.total_tax_deducted.is_none() {
            missing.push("total_tax_deducted");
        }
        missing
    }
}

/// A PDF that could not be opened or read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionError {
    /// Path of the PDF relative to the scanned root.
    pub source_path: PathBuf,
    /// Human-readable failure reason.
    pub reason: String,
}

impl ExtractionError {
    pub fn new(source_path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source_path.display(), self.reason)
    }
}

/// Outcome of processing one file.
pub type FileOutcome = std::result::Result<ExtractionRecord, ExtractionError>;

/// Records and errors collected from one walk over a directory tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// One record per PDF that could be opened.
    pub records: Vec<ExtractionRecord>,
    /// One entry per PDF that could not be opened.
    pub errors: Vec<ExtractionError>,
}

impl Batch {
    /// Add one file outcome, keeping arrival order.
    pub fn push(&mut self, outcome: FileOutcome) {
        match outcome {
            Ok(record) => self.records.push(record),
            Err(error) => self.errors.push(error),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(deal: &str, path: &str) -> ExtractionRecord {
        ExtractionRecord {
            deductee_id: None,
            total_amount_paid: None,
            total_tax_deducted: None,
            deal_name: deal.to_string(),
            source_path: PathBuf::from(path),
        }
    }

    #[test]
    fn test_push_splits_records_and_errors() {
        let mut batch = Batch::default();
        batch.push(Ok(record("Deal A", "Deal A/one.pdf")));
        batch.push(Err(ExtractionError::new("Deal A/bad.pdf", "failed to parse PDF")));
        batch.push(Ok(record("Deal A", "Deal A/two.pdf")));

        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.errors.len(), 1);
        assert_eq!(batch.records[1].source_path, PathBuf::from("Deal A/two.pdf"));
    }

    #[test]
    fn test_missing_fields() {
        let mut rec = record("Deal", "Deal/x.pdf");
        assert!(rec.is_blank());
        rec.deductee_id = Some("ABCDE1234F".to_string());
        assert_eq!(rec.missing_fields(), vec!["total_amount_paid", "total_tax_deducted"]);
    }

    #[test]
    fn test_error_display() {
        let err = ExtractionError::new("Deal/x.pdf", "PDF is encrypted");
        assert_eq!(err.to_string(), "Deal/x.pdf: PDF is encrypted");
    }
}
