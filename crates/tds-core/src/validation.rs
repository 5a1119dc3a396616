//! Post-hoc data-quality checks on an exported table.
//!
//! Validation never changes data; it only reports. Every check runs on every
//! row, so a row can collect several flags.

use std::fmt;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Result;
use crate::models::config::ColumnNames;
use crate::models::record::Batch;
use crate::statement::rules::is_valid_identifier;
use crate::table::{batch_rows, read_rows_from_path, TableRow};

/// A data-quality finding on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFlag {
    /// Identifier absent or not shaped like a PAN.
    InvalidIdentifier,
    /// Amount paid or tax deducted absent.
    MissingAmount,
    /// Amount paid or tax deducted below zero.
    NegativeAmount,
    /// Tax deducted larger than the amount paid.
    TaxExceedsPaid,
}

impl ValidationFlag {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier => "invalid identifier format",
            Self::MissingAmount => "missing total paid or total tax deducted",
            Self::NegativeAmount => "negative values found",
            Self::TaxExceedsPaid => "tax deducted exceeds amount paid",
        }
    }
}

impl fmt::Display for ValidationFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Flags raised on one row (1-based data row number).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowReport {
    pub row: usize,
    pub flags: Vec<ValidationFlag>,
}

impl fmt::Display for RowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reasons: Vec<&str> = self.flags.iter().map(ValidationFlag::reason).collect();
        write!(f, "Row {}: {}", self.row, reasons.join(", "))
    }
}

/// Outcome of validating a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Number of rows examined.
    pub rows_checked: usize,
    /// Flagged rows only, in table order.
    pub flagged: Vec<RowReport>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.flagged.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return f.write_str("CSV data is valid");
        }
        for (i, row) in self.flagged.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// Checks identifier shape, presence, sign and consistency of amounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordValidator;

impl RecordValidator {
    pub fn new() -> Self {
        Self
    }

    /// All flags raised by one row.
    pub fn validate_row(&self, row: &TableRow) -> Vec<ValidationFlag> {
        let mut flags = Vec::new();

        if !row.deductee_id.as_deref().is_some_and(is_valid_identifier) {
            flags.push(ValidationFlag::InvalidIdentifier);
        }

        if row.total_amount_paid.is_none() || row.total_tax_deducted.is_none() {
            flags.push(ValidationFlag::MissingAmount);
        }

        let negative = [row.total_amount_paid, row.total_tax_deducted]
            .iter()
            .flatten()
            .any(|v| *v < Decimal::ZERO);
        if negative {
            flags.push(ValidationFlag::NegativeAmount);
        }

        if let (Some(paid), Some(tax)) = (row.total_amount_paid, row.total_tax_deducted) {
            if tax > paid {
                flags.push(ValidationFlag::TaxExceedsPaid);
            }
        }

        flags
    }

    /// Validate rows in order; row numbers start at 1.
    pub fn validate(&self, rows: &[TableRow]) -> ValidationReport {
        let flagged = rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| {
                let flags = self.validate_row(row);
                (!flags.is_empty()).then(|| RowReport { row: i + 1, flags })
            })
            .collect();

        ValidationReport {
            rows_checked: rows.len(),
            flagged,
        }
    }

    /// Validate a batch as it would be exported.
    pub fn validate_batch(&self, batch: &Batch) -> ValidationReport {
        self.validate(&batch_rows(batch))
    }

    /// Validate an exported CSV file.
    pub fn validate_file(&self, path: &Path, columns: &ColumnNames) -> Result<ValidationReport> {
        let rows = read_rows_from_path(path, columns)?;
        Ok(self.validate(&rows))
    }
}
