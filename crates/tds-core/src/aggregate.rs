//! Deal folder traversal and batch aggregation.
//!
//! Any directory that directly holds at least one PDF is a deal folder, at
//! whatever depth it sits below the root. Every PDF is read, normalized and
//! parsed on its own; a file that cannot be read becomes an
//! [`ExtractionError`] and the walk carries on.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{PdfError, Result, TdsError};
use crate::models::config::{PdfConfig, ScanConfig, TdsConfig};
use crate::models::record::{Batch, ExtractionError, FileOutcome};
use crate::pdf::{join_pages, PdfExtractor, PdfProcessor};
use crate::statement::StatementParser;

/// Something that can turn a file into per-page text.
pub trait DocumentSource {
    /// Read the text of every page of the document at `path`.
    fn read_pages(&self, path: &Path) -> Result<Vec<String>>;
}

/// Reads PDFs from disk with [`PdfExtractor`].
#[derive(Debug, Clone, Default)]
pub struct PdfFileSource {
    config: PdfConfig,
}

impl PdfFileSource {
    pub fn new(config: PdfConfig) -> Self {
        Self { config }
    }
}

impl DocumentSource for PdfFileSource {
    fn read_pages(&self, path: &Path) -> Result<Vec<String>> {
        let size = fs::metadata(path)?.len();
        if size > self.config.max_file_size {
            return Err(PdfError::TooLarge {
                size,
                limit: self.config.max_file_size,
            }
            .into());
        }

        let data = fs::read(path)?;
        let mut extractor =
            PdfExtractor::new().with_empty_password_decrypt(self.config.decrypt_empty_password);
        extractor.load(&data)?;

        debug!("{} has {} pages", path.display(), extractor.page_count());
        Ok(extractor.extract_pages()?)
    }
}

/// A PDF found during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredPdf {
    /// Path usable for opening the file.
    pub path: PathBuf,
    /// Path relative to the scanned root.
    pub relative_path: PathBuf,
    /// Name of the directory directly containing the file.
    pub deal_name: String,
    /// File name without directories.
    pub file_name: String,
}

/// Result of walking a root directory.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// PDFs in traversal order.
    pub files: Vec<DiscoveredPdf>,
    /// Entries the walk could not read.
    pub errors: Vec<ExtractionError>,
}

/// A deal folder and the PDFs it directly contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealFolder {
    pub name: String,
    /// Folder path relative to the root (empty for the root itself).
    pub relative_path: PathBuf,
    pub files: Vec<String>,
}

impl Discovery {
    /// Group discovered files by their containing folder, in traversal order.
    pub fn deal_folders(&self) -> Vec<DealFolder> {
        let mut folders: Vec<DealFolder> = Vec::new();

        for file in &self.files {
            let folder_path = file
                .relative_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();

            match folders.last_mut() {
                Some(folder) if folder.relative_path == folder_path => {
                    folder.files.push(file.file_name.clone());
                }
                _ => folders.push(DealFolder {
                    name: file.deal_name.clone(),
                    relative_path: folder_path,
                    files: vec![file.file_name.clone()],
                }),
            }
        }

        folders
    }
}

/// Walks deal folders and extracts a record from every PDF.
pub struct DealAggregator<S = PdfFileSource> {
    source: S,
    parser: StatementParser,
    scan: ScanConfig,
}

impl DealAggregator<PdfFileSource> {
    /// Create an aggregator reading PDFs from disk with default settings.
    pub fn new() -> Self {
        Self::with_source(PdfFileSource::default())
    }

    /// Create an aggregator from the full pipeline configuration.
    pub fn from_config(config: &TdsConfig) -> Self {
        Self::with_source(PdfFileSource::new(config.pdf.clone()))
            .with_parser(StatementParser::from_config(&config.extraction))
            .with_scan_config(config.scan.clone())
    }
}

impl Default for DealAggregator<PdfFileSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DocumentSource> DealAggregator<S> {
    /// Create an aggregator over a custom document source.
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            parser: StatementParser::new(),
            scan: ScanConfig::default(),
        }
    }

    /// Replace the statement parser.
    pub fn with_parser(mut self, parser: StatementParser) -> Self {
        self.parser = parser;
        self
    }

    /// Replace the traversal settings.
    pub fn with_scan_config(mut self, scan: ScanConfig) -> Self {
        self.scan = scan;
        self
    }

    pub fn parser(&self) -> &StatementParser {
        &self.parser
    }

    /// Find every PDF under `root`, sorted by file name at each level.
    pub fn discover(&self, root: &Path) -> Result<Discovery> {
        if !fs::metadata(root)?.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            )
            .into());
        }

        let root_name = folder_name(root);
        let mut walker = WalkDir::new(root)
            .follow_links(self.scan.follow_links)
            .sort_by_file_name();
        if let Some(depth) = self.scan.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut discovery = Discovery::default();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(|p| relative_to(root, p))
                        .unwrap_or_default();
                    warn!("Skipping unreadable entry {}: {}", path.display(), e);
                    discovery.errors.push(ExtractionError::new(path, e.to_string()));
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_pdf(entry.path()) {
                continue;
            }

            let path = entry.path().to_path_buf();
            let deal_name = match path.parent() {
                Some(parent) if parent != root => folder_name(parent),
                _ => root_name.clone(),
            };

            discovery.files.push(DiscoveredPdf {
                relative_path: relative_to(root, &path),
                file_name: entry.file_name().to_string_lossy().into_owned(),
                deal_name,
                path,
            });
        }

        debug!(
            "Found {} PDFs under {} ({} walk errors)",
            discovery.files.len(),
            root.display(),
            discovery.errors.len()
        );
        Ok(discovery)
    }

    /// Read and parse one discovered PDF.
    pub fn process_file(&self, file: &DiscoveredPdf) -> FileOutcome {
        let pages = match self.source.read_pages(&file.path) {
            Ok(pages) => pages,
            Err(e) => {
                warn!("Failed to process {}: {}", file.relative_path.display(), e);
                return Err(ExtractionError::new(file.relative_path.clone(), e.to_string()));
            }
        };

        let text = join_pages(&pages);
        let record = self
            .parser
            .parse(&text, &file.file_name)
            .into_record(file.deal_name.clone(), file.relative_path.clone());

        if record.is_blank() {
            debug!("No fields resolved in {}", file.relative_path.display());
        } else {
            let missing = record.missing_fields();
            if !missing.is_empty() {
                debug!(
                    "Unresolved in {}: {}",
                    file.relative_path.display(),
                    missing.join(", ")
                );
            }
        }
        info!("Processed: {}/{}", file.deal_name, file.file_name);
        Ok(record)
    }

    /// Process every discovered PDF, calling `on_file` after each one.
    ///
    /// Walk errors from `discovery` are appended after the per-file errors.
    pub fn collect_discovered<F>(&self, discovery: Discovery, mut on_file: F) -> Batch
    where
        F: FnMut(&DiscoveredPdf),
    {
        let mut batch = Batch::default();
        for file in &discovery.files {
            batch.push(self.process_file(file));
            on_file(file);
        }
        batch.errors.extend(discovery.errors);
        batch
    }

    /// Walk `root` and process every PDF, whatever the outcome.
    pub fn collect(&self, root: &Path) -> Result<Batch> {
        Ok(self.collect_discovered(self.discover(root)?, |_| {}))
    }

    /// Like [`collect_discovered`](Self::collect_discovered), but a batch
    /// without records is an error.
    ///
    /// Returns [`TdsError::EmptyBatch`] carrying every per-file error.
    pub fn aggregate_discovered<F>(&self, discovery: Discovery, on_file: F) -> Result<Batch>
    where
        F: FnMut(&DiscoveredPdf),
    {
        let batch = self.collect_discovered(discovery, on_file);
        if batch.is_empty() {
            return Err(TdsError::EmptyBatch {
                errors: batch.errors,
            });
        }
        Ok(batch)
    }

    /// Walk `root` and process every PDF.
    ///
    /// Returns [`TdsError::EmptyBatch`] when no PDF produced a record.
    pub fn aggregate(&self, root: &Path) -> Result<Batch> {
        self.aggregate_discovered(self.discover(root)?, |_| {})
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

fn folder_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            dir.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| dir.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::ColumnNames;
    use crate::pdf::fixtures::{empty_pdf, statement_pdf};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tempfile::TempDir;

    /// Treats files as plain text with form feeds between pages.
    struct TextSource;

    impl DocumentSource for TextSource {
        fn read_pages(&self, path: &Path) -> Result<Vec<String>> {
            let text = fs::read_to_string(path)?;
            if text.starts_with("%CORRUPT") {
                return Err(PdfError::Parse("invalid file header".to_string()).into());
            }
            Ok(text.split('\u{c}').map(str::to_string).collect())
        }
    }

    const STATEMENT: &str = "Summary of payment\n1 12,345.67\nTotal (Rs.) 12,345.67\n\u{c}\
                             Q1 QVBTXRNB 1,234.57 1,234.57\nTotal (Rs.) 1,234.57\n";

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn aggregator() -> DealAggregator<TextSource> {
        DealAggregator::with_source(TextSource)
    }

    #[test]
    fn test_deal_folder_with_corrupt_pdf() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Deal A/AAACD1461F_Q1.pdf", STATEMENT);
        write(dir.path(), "Deal A/BBBCD1461F_Q1.pdf", STATEMENT);
        write(dir.path(), "Deal A/broken.pdf", "%CORRUPT");

        let batch = aggregator().aggregate(dir.path()).unwrap();

        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.errors.len(), 1);
        assert!(batch.records.iter().all(|r| r.deal_name == "Deal A"));
        assert_eq!(batch.records[0].deductee_id.as_deref(), Some("AAACD1461F"));
        assert_eq!(batch.records[1].deductee_id.as_deref(), Some("BBBCD1461F"));
        assert_eq!(batch.records[0].total_amount_paid, Some(dec("12345.67")));
        assert_eq!(batch.records[0].total_tax_deducted, Some(dec("1234.57")));
        assert_eq!(batch.errors[0].source_path, PathBuf::from("Deal A/broken.pdf"));
        assert!(batch.errors[0].reason.contains("invalid file header"));

        // traversal is repeatable
        assert_eq!(aggregator().aggregate(dir.path()).unwrap(), batch);
    }

    #[test]
    fn test_empty_tree() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Deal A/notes.txt", "not a statement");

        match aggregator().aggregate(dir.path()) {
            Err(TdsError::EmptyBatch { errors }) => assert!(errors.is_empty()),
            other => panic!("expected EmptyBatch, got {:?}", other),
        }
    }

    #[test]
    fn test_all_files_unreadable() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Deal A/one.pdf", "%CORRUPT");
        write(dir.path(), "Deal B/two.pdf", "%CORRUPT");

        match aggregator().aggregate(dir.path()) {
            Err(TdsError::EmptyBatch { errors }) => assert_eq!(errors.len(), 2),
            other => panic!("expected EmptyBatch, got {:?}", other),
        }

        let batch = aggregator().collect(dir.path()).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.errors.len(), 2);
    }

    #[test]
    fn test_textless_pdf_still_yields_record() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Deal A/scan.pdf", "\u{c}\u{c}");

        let batch = aggregator().aggregate(dir.path()).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert!(batch.records[0].is_blank());
        assert_eq!(batch.records[0].deal_name, "Deal A");
    }

    #[test]
    fn test_nested_deal_folders_and_extensions() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "FY 2024-25 Q1/Deal B/x.PDF", STATEMENT);
        write(dir.path(), "FY 2024-25 Q1/Deal A/y.pdf", STATEMENT);
        write(dir.path(), "FY 2024-25 Q1/Deal A/readme.md", "ignored");
        write(dir.path(), "top.pdf", STATEMENT);

        let agg = aggregator();
        let discovery = agg.discover(dir.path()).unwrap();
        let found: Vec<_> = discovery
            .files
            .iter()
            .map(|f| (f.deal_name.as_str(), f.file_name.as_str()))
            .collect();

        let root_name = folder_name(dir.path());
        assert_eq!(
            found,
            vec![
                ("Deal A", "y.pdf"),
                ("Deal B", "x.PDF"),
                (root_name.as_str(), "top.pdf"),
            ]
        );

        let folders = discovery.deal_folders();
        assert_eq!(folders.len(), 3);
        assert_eq!(folders[0].relative_path, PathBuf::from("FY 2024-25 Q1/Deal A"));
        assert_eq!(folders[2].relative_path, PathBuf::new());
    }

    #[test]
    fn test_max_depth_limits_walk() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Deal A/a.pdf", STATEMENT);
        write(dir.path(), "Outer/Deal B/b.pdf", STATEMENT);

        let agg = aggregator().with_scan_config(ScanConfig {
            follow_links: false,
            max_depth: Some(2),
        });
        let batch = agg.aggregate(dir.path()).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].deal_name, "Deal A");
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let result = aggregator().aggregate(&dir.path().join("nope"));
        assert!(matches!(result, Err(TdsError::Io(_))));
    }

    #[test]
    fn test_pdf_source_rejects_corrupt_and_large_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Deal A/corrupt.pdf", "garbage, not a PDF");

        let batch = DealAggregator::new().collect(dir.path()).unwrap();
        assert!(batch.records.is_empty());
        assert_eq!(batch.errors.len(), 1);
        assert!(batch.errors[0].reason.contains("failed to parse PDF"));

        let small = PdfFileSource::new(PdfConfig {
            decrypt_empty_password: true,
            max_file_size: 4,
        });
        let batch = DealAggregator::with_source(small).collect(dir.path()).unwrap();
        assert!(batch.errors[0].reason.contains("limit is 4"));
    }

    #[test]
    fn test_collect_discovered_reports_each_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Deal A/a.pdf", STATEMENT);
        write(dir.path(), "Deal A/b.pdf", "%CORRUPT");
        write(dir.path(), "Deal B/c.pdf", STATEMENT);

        let agg = aggregator();
        let discovery = agg.discover(dir.path()).unwrap();
        let mut seen = Vec::new();
        let batch = agg
            .aggregate_discovered(discovery, |file| seen.push(file.file_name.clone()))
            .unwrap();

        assert_eq!(seen, vec!["a.pdf", "b.pdf", "c.pdf"]);
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.errors.len(), 1);
    }

    #[test]
    fn test_pdf_source_zero_page_pdf_yields_blank_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Deal A/ABCDE1234F.pdf");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, empty_pdf()).unwrap();

        let batch = DealAggregator::new().collect(dir.path()).unwrap();
        assert_eq!(batch.errors, Vec::new());
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].deductee_id.as_deref(), Some("ABCDE1234F"));
        assert_eq!(batch.records[0].total_amount_paid, None);
        assert_eq!(batch.records[0].total_tax_deducted, None);
        assert_eq!(batch.records[0].deal_name, "Deal A");
    }

    #[test]
    fn test_pdf_source_statement_to_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Deal A/AAACD1461F_Q1.pdf");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            statement_pdf(&[
                "Summary of payment",
                "1 2,50,000.00 194A",
                "Total (Rs.) 2,50,000.00",
                "Q1 QVBTXRNB 25,000.00 25,000.00",
                "Total (Rs.) 25,000.00",
            ]),
        )
        .unwrap();

        let batch = DealAggregator::new().aggregate(dir.path()).unwrap();
        assert_eq!(batch.errors, Vec::new());
        assert_eq!(batch.records.len(), 1);

        let record = &batch.records[0];
        assert_eq!(record.deductee_id.as_deref(), Some("AAACD1461F"));
        assert_eq!(record.total_amount_paid, Some(dec("250000.00")));
        assert_eq!(record.total_tax_deducted, Some(dec("25000.00")));

        let mut out = Vec::new();
        crate::table::write_batch(&batch, &ColumnNames::default(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "PAN of deductee,Total Amount paid,Total TDS,Name of deal\n\
             AAACD1461F,250000.00,25000.00,Deal A\n"
        );
    }
}
