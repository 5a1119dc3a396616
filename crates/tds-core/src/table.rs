//! Four-column CSV export of a batch, and reading it back for validation.

use std::fs::File;
use std::io;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TdsError};
use crate::models::config::ColumnNames;
use crate::models::record::{Batch, ExtractionRecord};
use crate::statement::rules::parse_amount;

/// One row of an exported table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub deductee_id: Option<String>,
    pub total_amount_paid: Option<Decimal>,
    pub total_tax_deducted: Option<Decimal>,
    pub deal_name: Option<String>,
}

impl From<&ExtractionRecord> for TableRow {
    fn from(record: &ExtractionRecord) -> Self {
        Self {
            deductee_id: record.deductee_id.clone(),
            total_amount_paid: record.total_amount_paid,
            total_tax_deducted: record.total_tax_deducted,
            deal_name: Some(record.deal_name.clone()),
        }
    }
}

/// Rows of a batch in export order.
pub fn batch_rows(batch: &Batch) -> Vec<TableRow> {
    batch.records.iter().map(TableRow::from).collect()
}

/// Write the batch records as CSV: identifier, amount paid, tax deducted, deal name.
pub fn write_batch<W: io::Write>(batch: &Batch, columns: &ColumnNames, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(columns.headers())?;

    for record in &batch.records {
        wtr.write_record([
            record.deductee_id.clone().unwrap_or_default(),
            format_cell(record.total_amount_paid),
            format_cell(record.total_tax_deducted),
            record.deal_name.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the batch records to a CSV file.
pub fn write_batch_to_path(batch: &Batch, columns: &ColumnNames, path: &Path) -> Result<()> {
    write_batch(batch, columns, File::create(path)?)
}

/// Read exported rows back.
///
/// Empty cells and amounts that do not parse are read as absent.
pub fn read_rows<R: io::Read>(reader: R, columns: &ColumnNames) -> Result<Vec<TableRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let index_of = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| TdsError::MissingColumn(name.to_string()))
    };

    let id_idx = index_of(&columns.deductee_id)?;
    let paid_idx = index_of(&columns.total_amount_paid)?;
    let tax_idx = index_of(&columns.total_tax_deducted)?;
    let deal_idx = index_of(&columns.deal_name)?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let raw = |idx: usize| record.get(idx).filter(|s| !s.is_empty());
        let amount = |idx: usize| raw(idx).and_then(parse_amount);

        rows.push(TableRow {
            // Identifier is kept verbatim so stray whitespace gets flagged
            deductee_id: raw(id_idx).map(str::to_string),
            total_amount_paid: amount(paid_idx),
            total_tax_deducted: amount(tax_idx),
            deal_name: raw(deal_idx).map(str::to_string),
        });
    }

    Ok(rows)
}

/// Read exported rows from a CSV file.
pub fn read_rows_from_path(path: &Path, columns: &ColumnNames) -> Result<Vec<TableRow>> {
    read_rows(File::open(path)?, columns)
}

fn format_cell(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use std::str::FromStr;

    fn sample_batch() -> Batch {
        Batch {
            records: vec![
                ExtractionRecord {
                    deductee_id: Some("AAACD1461F".to_string()),
                    total_amount_paid: Some(Decimal::from_str("250000.00").unwrap()),
                    total_tax_deducted: Some(Decimal::from_str("25000.00").unwrap()),
                    deal_name: "Aavishkaar Trust 1".to_string(),
                    source_path: PathBuf::from("Aavishkaar Trust 1/AAACD1461F_Q1.pdf"),
                },
                ExtractionRecord {
                    deductee_id: None,
                    total_amount_paid: None,
                    total_tax_deducted: None,
                    deal_name: "Deal, With Comma".to_string(),
                    source_path: PathBuf::from("Deal, With Comma/scan.pdf"),
                },
            ],
            errors: Vec::new(),
        }
    }

    #[test]
    fn test_write_batch_layout() {
        let mut out = Vec::new();
        write_batch(&sample_batch(), &ColumnNames::default(), &mut out).unwrap();

        let csv = String::from_utf8(out).unwrap();
        assert_eq!(
            csv,
            "PAN of deductee,Total Amount paid,Total TDS,Name of deal\n\
             AAACD1461F,250000.00,25000.00,Aavishkaar Trust 1\n\
             ,,,\"Deal, With Comma\"\n"
        );
    }

    #[test]
    fn test_read_rows_back() {
        let mut out = Vec::new();
        let batch = sample_batch();
        write_batch(&batch, &ColumnNames::default(), &mut out).unwrap();

        let rows = read_rows(out.as_slice(), &ColumnNames::default()).unwrap();
        assert_eq!(rows, batch_rows(&batch));
    }

    #[test]
    fn test_read_rows_reordered_columns_and_bad_cells() {
        let csv = "Name of deal,Total TDS,PAN of deductee,Total Amount paid\n\
                   Deal A,n/a,ABCDE1234F,\"1,000.00\"\n";
        let rows = read_rows(csv.as_bytes(), &ColumnNames::default()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].deductee_id.as_deref(), Some("ABCDE1234F"));
        assert_eq!(rows[0].total_amount_paid, Some(Decimal::from_str("1000.00").unwrap()));
        assert_eq!(rows[0].total_tax_deducted, None);
        assert_eq!(rows[0].deal_name.as_deref(), Some("Deal A"));
    }

    #[test]
    fn test_read_rows_keeps_identifier_whitespace() {
        let csv = "PAN of deductee,Total Amount paid,Total TDS,Name of deal\n\
                   \" AAAAA0000A\", 100.00 ,10.00,Deal A\n";
        let rows = read_rows(csv.as_bytes(), &ColumnNames::default()).unwrap();

        assert_eq!(rows[0].deductee_id.as_deref(), Some(" AAAAA0000A"));
        assert_eq!(rows[0].total_amount_paid, Some(Decimal::from_str("100.00").unwrap()));
    }

    #[test]
    fn test_read_rows_missing_column() {
        let csv = "PAN of deductee,Total Amount paid\nABCDE1234F,1.00\n";
        match read_rows(csv.as_bytes(), &ColumnNames::default()) {
            Err(TdsError::MissingColumn(name)) => assert_eq!(name, "Total TDS"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }
}
