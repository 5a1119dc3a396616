//! PDF processing module.

mod extractor;
#[cfg(test)]
pub(crate) mod fixtures;
mod normalize;

pub use extractor::PdfExtractor;
pub use normalize::join_pages;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract the text of every page, in page order.
    ///
    /// Pages without text come back as empty strings.
    fn extract_pages(&self) -> Result<Vec<String>>;
}
