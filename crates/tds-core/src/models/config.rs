//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the tds pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TdsConfig {
    /// PDF loading configuration.
    pub pdf: PdfConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Directory traversal configuration.
    pub scan: ScanConfig,

    /// Tabular export configuration.
    pub export: ExportConfig,
}

/// PDF loading configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Try to open encrypted PDFs with an empty user password.
    pub decrypt_empty_password: bool,

    /// Files larger than this many bytes are rejected without parsing.
    pub max_file_size: u64,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            decrypt_empty_password: true,
            max_file_size: 100 * 1024 * 1024,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Fall back to the "PAN of the deductee" label in the document text
    /// when the file name carries no PAN.
    pub identifier_from_text: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            identifier_from_text: true,
        }
    }
}

/// Directory traversal configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Follow symbolic links while walking.
    pub follow_links: bool,

    /// Maximum walk depth below the root (None = unlimited).
    pub max_depth: Option<usize>,
}

/// Tabular export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Column headers of the exported table.
    pub columns: ColumnNames,

    /// Output file name used when neither a path nor a quarter is given.
    pub default_file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            default_file_name: "tds_data_output.csv".to_string(),
        }
    }
}

/// Header names of the four exported columns, in export order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub deductee_id: String,
    pub total_amount_paid: String,
    pub total_tax_deducted: String,
    pub deal_name: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            deductee_id: "PAN of deductee".to_string(),
            total_amount_paid: "Total Amount paid".to_string(),
            total_tax_deducted: "Total TDS".to_string(),
            deal_name: "Name of deal".to_string(),
        }
    }
}

impl ColumnNames {
    /// Headers in export order.
    pub fn headers(&self) -> [&str; 4] {
        [
            &self.deductee_id,
            &self.total_amount_paid,
            &self.total_tax_deducted,
            &self.deal_name,
        ]
    }
}

impl TdsConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Output file name for an export, optionally named after a quarter.
    pub fn output_file_name(&self, quarter: Option<&str>) -> PathBuf {
        match quarter {
            Some(q) if !q.trim().is_empty() => PathBuf::from(format!("{}.csv", q.trim())),
            _ => PathBuf::from(&self.export.default_file_name),
        }
    }
}
