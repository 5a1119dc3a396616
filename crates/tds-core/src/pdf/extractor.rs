//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, trace};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text extractor using lopdf, with pdf-extract as a second engine.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    decrypt_empty_password: bool,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            decrypt_empty_password: true,
        }
    }

    /// Set whether encrypted PDFs are retried with an empty password.
    pub fn with_empty_password_decrypt(mut self, decrypt: bool) -> Self {
        self.decrypt_empty_password = decrypt;
        self
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }

    /// Page-by-page extraction through lopdf.
    ///
    /// Returns `None` when lopdf failed on every page.
    fn lopdf_pages(&self, doc: &Document) -> Option<Vec<String>> {
        let mut pages = Vec::new();
        let mut failures = 0;

        for page_num in doc.get_pages().keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(text) => pages.push(text),
                Err(e) => {
                    trace!("lopdf could not read page {}: {}", page_num, e);
                    failures += 1;
                    pages.push(String::new());
                }
            }
        }

        if failures == pages.len() {
            None
        } else {
            Some(pages)
        }
    }

    /// Whole-document extraction through pdf-extract.
    fn pdf_extract_text(&self) -> Result<String> {
        // pdf-extract panics on some malformed font programs
        let data = self.raw_data.as_slice();
        let outcome = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data));

        match outcome {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(PdfError::TextExtraction(e.to_string())),
            Err(_) => Err(PdfError::TextExtraction(
                "text engine aborted on malformed content".to_string(),
            )),
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            if !self.decrypt_empty_password || doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        debug!("Loaded PDF with {} pages", doc.get_pages().len());
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_pages(&self) -> Result<Vec<String>> {
        let doc = self.document()?;
        if doc.get_pages().is_empty() {
            return Ok(Vec::new());
        }

        let lopdf_pages = self.lopdf_pages(doc);
        let has_text = lopdf_pages
            .as_ref()
            .is_some_and(|pages| pages.iter().any(|p| !p.trim().is_empty()));

        if has_text {
            return Ok(lopdf_pages.unwrap_or_default());
        }

        debug!("lopdf produced no text, trying pdf-extract");
        match (self.pdf_extract_text(), lopdf_pages) {
            (Ok(text), _) => Ok(vec![text]),
            // Readable but textless: hand back the empty pages
            (Err(e), Some(pages)) => {
                debug!("pdf-extract failed on a textless PDF: {}", e);
                Ok(pages)
            }
            (Err(e), None) => Err(e),
        }
    }
}
