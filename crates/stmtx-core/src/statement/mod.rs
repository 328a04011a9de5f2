//! Statement extraction: issuer detection, account fields and transaction rows.

pub mod detector;
mod extractor;
pub mod fields;
pub mod layouts;
pub mod rules;
pub mod section;

pub use detector::{detect_issuer, Issuer, IssuerDetector};
pub use extractor::{StatementExtraction, StatementExtractor};
pub use fields::{extract_account, FieldExtractor, FieldPattern, FieldRule, GroupSelector};
pub use layouts::{HdfcLayout, IciciLayout, StatementLayout};
pub use section::{extract_section, SectionMarkers, StartMarker};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
