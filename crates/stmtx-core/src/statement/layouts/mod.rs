//! Supported statement layouts.

pub mod hdfc;
pub mod icici;

pub use hdfc::HdfcLayout;
pub use icici::IciciLayout;

use crate::models::account::AccountInfo;
use crate::models::transaction::TransactionRecord;

use super::{FieldRule, Issuer, SectionMarkers};

/// Everything needed to extract one issuer's statements.
pub trait StatementLayout {
    /// Issuer this layout belongs to.
    fn issuer(&self) -> Issuer;

    /// Account field chains.
    fn field_rules(&self) -> &'static [FieldRule];

    /// Record returned when field extraction fails internally.
    fn fallback_account(&self) -> AccountInfo;

    /// Transaction table boundaries.
    fn section_markers(&self) -> &'static SectionMarkers;

    /// Parse one candidate line; `None` when it is not a transaction.
    fn parse_line(&self, line: &str) -> Option<TransactionRecord>;
}
