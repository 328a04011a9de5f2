//! Error types for the stmtx-core library.

use thiserror::Error;

/// Main error type for the stmtx library.
#[derive(Error, Debug)]
pub enum StatementError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Statement extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to statement extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No text could be extracted from any page.
    #[error("no text could be extracted from the document")]
    EmptyDocument,

    /// The text matches none of the supported statement layouts.
    #[error("unsupported issuer: statement matches no known layout")]
    UnsupportedIssuer,

    /// A field pattern failed to compile.
    #[error("invalid pattern for {field}: {pattern}")]
    InvalidPattern {
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for the stmtx library.
pub type Result<T> = std::result::Result<T, StatementError>;
