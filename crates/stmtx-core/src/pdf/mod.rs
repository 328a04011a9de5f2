//! PDF processing module.

mod extractor;
#[cfg(test)]
pub(crate) mod fixtures;

pub use extractor::{PdfContent, PdfExtractor, PdfPage};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF text backends.
///
/// A backend opens a document and yields its text page by page. Pages whose
/// text cannot be extracted are reported as `None` rather than failing the
/// whole document.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract the text of every page, in page order.
    fn extract_pages(&self) -> Result<Vec<Option<String>>>;

    /// Extract text from the entire PDF with a secondary backend.
    ///
    /// Used when the page text is blank.
    fn extract_text(&self) -> Result<String>;
}
