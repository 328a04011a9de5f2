//! End-to-end statement extraction.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use crate::error::{ExtractionError, Result};
use crate::models::account::AccountExtraction;
use crate::models::config::StatementConfig;
use crate::models::transaction::TransactionTable;
use crate::pdf::{PdfContent, PdfExtractor, PdfProcessor};

use super::fields::extract_account;
use super::layouts::{HdfcLayout, IciciLayout, StatementLayout};
use super::section::extract_section;
use super::{Issuer, IssuerDetector};

/// Result of statement extraction.
#[derive(Debug, Clone)]
pub struct StatementExtraction {
    /// Detected issuer.
    pub issuer: Issuer,
    /// Account metadata with provenance.
    pub account: AccountExtraction,
    /// Parsed transactions, in document order.
    pub transactions: TransactionTable,
    /// Lines found inside the transaction section.
    pub candidate_lines: usize,
    /// Candidate lines that did not parse as transactions.
    pub rejected_lines: usize,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Turns statement documents into account metadata and transaction tables.
///
/// Immutable after construction, so one extractor can serve many documents
/// from many threads.
#[derive(Debug, Clone, Default)]
pub struct StatementExtractor {
    config: StatementConfig,
    detector: IssuerDetector,
}

impl StatementExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with the given configuration.
    pub fn with_config(config: StatementConfig) -> Self {
        let detector = IssuerDetector::from_config(&config.detection);
        Self { config, detector }
    }

    pub fn config(&self) -> &StatementConfig {
        &self.config
    }

    /// Extract a statement from a PDF file.
    pub fn extract_from_path(&self, path: &Path) -> Result<StatementExtraction> {
        info!("Processing statement: {}", path.display());
        let data = std::fs::read(path)?;
        self.extract_from_bytes(&data)
    }

    /// Extract a statement from PDF bytes.
    pub fn extract_from_bytes(&self, data: &[u8]) -> Result<StatementExtraction> {
        let mut pdf = PdfExtractor::new().with_max_pages(self.config.pdf.max_pages);
        pdf.load(data)?;
        self.extract_from_source(&pdf)
    }

    /// Extract a statement from an already loaded text backend.
    pub fn extract_from_source<P: PdfProcessor>(&self, source: &P) -> Result<StatementExtraction> {
        let start = Instant::now();
        let content = PdfContent::from_pages(source.extract_pages()?);

        if content.is_blank() && self.config.pdf.fallback_extractor {
            debug!("Page text is blank, retrying with the secondary backend");
            match source.extract_text() {
                Ok(full) => return self.process(&full, start),
                Err(e) => warn!("Secondary text extraction failed: {}", e),
            }
        }

        self.process(&content.text, start)
    }

    /// Extract a statement from per-page texts; `None` marks a page without text.
    pub fn extract_from_pages(&self, pages: Vec<Option<String>>) -> Result<StatementExtraction> {
        let start = Instant::now();
        let content = PdfContent::from_pages(pages);
        self.process(&content.text, start)
    }

    /// Extract a statement from its full text.
    pub fn extract_from_text(&self, text: &str) -> Result<StatementExtraction> {
        self.process(text, Instant::now())
    }

    fn process(&self, text: &str, start: Instant) -> Result<StatementExtraction> {
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyDocument.into());
        }

        let issuer = self.detector.detect(text);
        info!("Extracting {} statement from {} characters of text", issuer, text.len());

        let mut extraction = match issuer {
            Issuer::Icici => self.run(&IciciLayout, text),
            Issuer::Hdfc => self.run(&HdfcLayout, text),
            Issuer::Unknown => return Err(ExtractionError::UnsupportedIssuer.into()),
        };

        extraction.processing_time_ms = start.elapsed().as_millis() as u64;
        Ok(extraction)
    }

    fn run<L: StatementLayout>(&self, layout: &L, text: &str) -> StatementExtraction {
        let issuer = layout.issuer();
        let mut warnings = Vec::new();

        let extra_patterns = self.config.extraction.patterns_for(issuer);
        let account = extract_account(
            layout.field_rules(),
            &extra_patterns,
            layout.fallback_account(),
            text,
        );
        if account.degraded {
            warnings.push(format!(
                "Account details could not be extracted, using {} fallback values",
                issuer
            ));
        }

        let candidates = extract_section(text, layout.section_markers());
        let mut records = Vec::with_capacity(candidates.len());
        let mut rejected_lines = 0;

        for line in &candidates {
            match layout.parse_line(line) {
                Some(record) => records.push(record),
                None => {
                    rejected_lines += 1;
                    trace!("Rejected line: {:?}", line);
                }
            }
        }

        let transactions = TransactionTable::new(records);
        debug!(
            "Parsed {} transactions from {} candidate lines",
            transactions.len(),
            candidates.len()
        );

        if transactions.is_empty() {
            warnings.push("No transactions found".to_string());
        }

        let low_confidence = transactions.low_confidence_count();
        if low_confidence > 0 {
            warnings.push(format!(
                "{} transaction(s) have low-confidence amounts, guessed by keyword heuristics or left unassigned",
                low_confidence
            ));
        }

        StatementExtraction {
            issuer,
            account,
            transactions,
            candidate_lines: candidates.len(),
            rejected_lines,
            warnings,
            processing_time_ms: 0,
        }
    }
}
