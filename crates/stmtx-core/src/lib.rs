//! Core library for bank statement extraction.
//!
//! This crate provides:
//! - PDF text extraction (per page via lopdf, whole document via pdf-extract)
//! - Issuer detection for the supported statement layouts (ICICI, HDFC)
//! - Account metadata extraction via ordered regex pattern chains
//! - Transaction table extraction from the statement body
//! - Rule-based flagging of notable transactions

pub mod analysis;
pub mod error;
pub mod models;
pub mod pdf;
pub mod statement;

pub use analysis::{AnalysisReport, AnalysisSummary, FlaggedTransaction, TransactionAnalyzer, TransactionFlags};
pub use error::{ExtractionError, PdfError, Result, StatementError};
pub use models::account::{AccountExtraction, AccountField, AccountInfo, Provenance, NOT_FOUND};
pub use models::config::StatementConfig;
pub use models::transaction::{
    format_inr, AmountAssignment, TransactionRecord, TransactionTable, TRANSACTION_COLUMNS,
};
pub use pdf::{PdfContent, PdfExtractor, PdfProcessor};
pub use statement::{detect_issuer, Issuer, IssuerDetector, StatementExtraction, StatementExtractor};
