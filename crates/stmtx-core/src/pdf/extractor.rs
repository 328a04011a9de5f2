//! PDF text extraction using lopdf and pdf-extract.

use std::panic;

use lopdf::Document;
use tracing::{debug, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text extractor using pdf-extract and lopdf.
///
/// Page text comes from pdf-extract, which lays out glyphs by position so
/// cells drawn as separate text objects on one baseline stay on one line.
/// lopdf, which emits one line per text object, is the secondary backend.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    max_pages: usize,
}

/// Extracted content from a PDF.
#[derive(Debug, Clone)]
pub struct PdfContent {
    /// Concatenated text of all pages that produced text.
    pub text: String,
    /// Pages with their content.
    pub pages: Vec<PdfPage>,
}

/// Content from a single PDF page.
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Extracted text, `None` when the page text could not be extracted.
    pub text: Option<String>,
}

impl PdfContent {
    /// Build content from page texts, joining present pages with a trailing newline each.
    pub fn from_pages(pages: Vec<Option<String>>) -> Self {
        let mut text = String::new();
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, page_text)| {
                if let Some(t) = &page_text {
                    text.push_str(t);
                    text.push('\n');
                }
                PdfPage {
                    number: i as u32 + 1,
                    text: page_text,
                }
            })
            .collect();

        Self { text, pages }
    }

    /// Whether no page yielded any non-whitespace text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            max_pages: 0,
        }
    }

    /// Limit the number of pages read (0 = unlimited).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Extract all page text from the loaded document.
    pub fn extract_all(&self) -> Result<PdfContent> {
        let pages = self.extract_pages()?;
        let content = PdfContent::from_pages(pages);

        debug!(
            "PDF text: {} pages, {} chars",
            content.pages.len(),
            content.text.len()
        );

        Ok(content)
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }

    /// Text of each page from lopdf, one line per text object.
    fn extract_text_objects(&self) -> Result<Vec<Option<String>>> {
        let doc = self.document()?;
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();

        let pages = page_numbers
            .into_iter()
            .map(|number| match doc.extract_text(&[number]) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!("Could not extract text from page {}: {}", number, e);
                    None
                }
            })
            .collect();

        Ok(self.limit_pages(pages))
    }

    fn limit_pages(&self, mut pages: Vec<Option<String>>) -> Vec<Option<String>> {
        if self.max_pages > 0 && pages.len() > self.max_pages {
            debug!("Reading first {} of {} pages", self.max_pages, pages.len());
            pages.truncate(self.max_pages);
        }
        pages
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

        // Statements are often "protected" with an empty user password
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract reads raw bytes, so keep the decrypted form
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_pages(&self) -> Result<Vec<Option<String>>> {
        let page_count = self.page_count() as usize;
        self.document()?;

        // pdf-extract panics on some malformed font dictionaries
        let data = self.raw_data.as_slice();
        let positional = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(data));

        let mut pages: Vec<Option<String>> = match positional {
            Ok(Ok(texts)) => texts.into_iter().map(Some).collect(),
            Ok(Err(e)) => {
                warn!("Positional text extraction failed, reading text objects: {}", e);
                return self.extract_text_objects();
            }
            Err(_) => {
                warn!("Positional text extraction panicked, reading text objects");
                return self.extract_text_objects();
            }
        };

        // pdf-extract stops at the first page it cannot render
        if pages.len() < page_count {
            let objects = self.extract_text_objects()?;
            debug!(
                "Positional text covers {} of {} pages, reading the rest as text objects",
                pages.len(),
                page_count
            );
            pages.extend(objects.into_iter().skip(pages.len()));
        }

        Ok(self.limit_pages(pages))
    }

    fn extract_text(&self) -> Result<String> {
        let text = self
            .extract_text_objects()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("\n");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::{statement_pdf, ICICI_ROWS};

    fn normalized_lines(text: &str) -> Vec<String> {
        text.lines()
            .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|l| !l.is_empty())
            .collect()
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_extract_without_document_fails() {
        let extractor = PdfExtractor::new();
        assert!(matches!(extractor.extract_pages(), Err(PdfError::Parse(_))));
        assert!(matches!(extractor.extract_text(), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut extractor = PdfExtractor::new();
        let result = extractor.load(b"definitely not a pdf");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_content_from_pages_skips_absent() {
        let content = PdfContent::from_pages(vec![
            Some("first".to_string()),
            None,
            Some("third".to_string()),
        ]);

        assert_eq!(content.text, "first\nthird\n");
        assert_eq!(content.pages.len(), 3);
        assert_eq!(content.pages[1].number, 2);
        assert!(content.pages[1].text.is_none());
        assert!(!content.is_blank());
    }

    #[test]
    fn test_content_blank_when_pages_empty() {
        let content = PdfContent::from_pages(vec![Some("   ".to_string()), None]);
        assert!(content.is_blank());
    }

    #[test]
    fn test_cells_on_one_baseline_stay_on_one_line() {
        let mut extractor = PdfExtractor::new();
        extractor.load(&statement_pdf(ICICI_ROWS)).unwrap();
        assert_eq!(extractor.page_count(), 1);

        let pages = extractor.extract_pages().unwrap();
        assert_eq!(pages.len(), 1);

        let lines = normalized_lines(pages[0].as_deref().unwrap());
        assert!(lines.contains(&"15-06-2023 NEFT TRANSFER XYZ 5,000.00Dr 25,000.00Cr".to_string()));
        assert!(lines.contains(&"Statement of transactions in Savings Account".to_string()));
    }

    #[test]
    fn test_secondary_backend_reads_every_cell() {
        let mut extractor = PdfExtractor::new();
        extractor.load(&statement_pdf(ICICI_ROWS)).unwrap();

        let text = extractor.extract_text().unwrap();
        for cell in ["15-06-2023", "NEFT TRANSFER XYZ", "5,000.00Dr", "Page Total"] {
            assert!(text.contains(cell), "missing {:?}", cell);
        }
    }

    #[test]
    fn test_extract_all_numbers_pages() {
        let mut extractor = PdfExtractor::new().with_max_pages(5);
        extractor.load(&statement_pdf(ICICI_ROWS)).unwrap();

        let content = extractor.extract_all().unwrap();
        assert_eq!(content.pages.len(), 1);
        assert_eq!(content.pages[0].number, 1);
        assert!(!content.is_blank());
    }
}
