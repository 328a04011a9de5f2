//! Rule-based flagging of transactions worth a closer look.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::models::config::AnalysisConfig;
use crate::models::transaction::{TransactionRecord, TransactionTable};

/// Flags raised for a single transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransactionFlags {
    /// Demand-draft withdrawal above the configured threshold.
    pub is_large_dd: bool,
    /// RTGS deposit above the configured threshold.
    pub is_large_rtgs: bool,
    /// Description names a configured counterparty.
    pub is_suspicious_entity: bool,
}

impl TransactionFlags {
    pub fn any(&self) -> bool {
        self.is_large_dd || self.is_large_rtgs || self.is_suspicious_entity
    }
}

/// A transaction together with its flags, serialized as one flat row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedTransaction {
    #[serde(flatten)]
    pub record: TransactionRecord,
    #[serde(flatten)]
    pub flags: TransactionFlags,
}

/// Aggregate figures over an analyzed table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub total_transactions: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_withdrawals: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_deposits: Decimal,
    pub large_dd_count: usize,
    pub large_rtgs_count: usize,
    pub suspicious_entity_count: usize,
    /// Transactions with at least one flag.
    pub flagged_transactions: usize,
}

/// Flagged rows plus their summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub transactions: Vec<FlaggedTransaction>,
    pub summary: AnalysisSummary,
}

impl AnalysisReport {
    /// Only the rows that raised a flag.
    pub fn flagged(&self) -> impl Iterator<Item = &FlaggedTransaction> {
        self.transactions.iter().filter(|t| t.flags.any())
    }
}

/// Applies the configured flagging rules to transaction tables.
#[derive(Debug, Clone)]
pub struct TransactionAnalyzer {
    dd_withdrawal_threshold: Decimal,
    rtgs_deposit_threshold: Decimal,
    /// Lowercased entity names.
    suspicious_entities: Vec<String>,
}

impl TransactionAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            dd_withdrawal_threshold: config.dd_withdrawal_threshold,
            rtgs_deposit_threshold: config.rtgs_deposit_threshold,
            suspicious_entities: config
                .suspicious_entities
                .iter()
                .map(|e| e.to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// Evaluate every rule against one transaction.
    pub fn flags(&self, record: &TransactionRecord) -> TransactionFlags {
        let description = record.description.to_lowercase();

        let is_dd = description.contains("dd") || description.contains("demand draft");
        let is_rtgs = description.contains("rtgs");

        TransactionFlags {
            is_large_dd: is_dd && record.withdrawal_amount > self.dd_withdrawal_threshold,
            is_large_rtgs: is_rtgs && record.deposit_amount > self.rtgs_deposit_threshold,
            is_suspicious_entity: self
                .suspicious_entities
                .iter()
                .any(|e| description.contains(e.as_str())),
        }
    }

    /// Flag every transaction of a table and summarize the result.
    pub fn analyze(&self, table: &TransactionTable) -> AnalysisReport {
        let transactions: Vec<FlaggedTransaction> = table
            .iter()
            .map(|record| FlaggedTransaction {
                flags: self.flags(record),
                record: record.clone(),
            })
            .collect();

        let count = |f: fn(&TransactionFlags) -> bool| {
            transactions.iter().filter(|t| f(&t.flags)).count()
        };

        let summary = AnalysisSummary {
            total_transactions: transactions.len(),
            total_withdrawals: table.total_withdrawals(),
            total_deposits: table.total_deposits(),
            large_dd_count: count(|f| f.is_large_dd),
            large_rtgs_count: count(|f| f.is_large_rtgs),
            suspicious_entity_count: count(|f| f.is_suspicious_entity),
            flagged_transactions: count(TransactionFlags::any),
        };

        debug!(
            "Flagged {} of {} transactions",
            summary.flagged_transactions, summary.total_transactions
        );

        AnalysisReport {
            transactions,
            summary,
        }
    }
}

impl Default for TransactionAnalyzer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}
