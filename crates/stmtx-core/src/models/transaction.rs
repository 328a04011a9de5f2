//! Transaction rows extracted from a statement.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Column names of the transaction table, in output order.
pub const TRANSACTION_COLUMNS: [&str; 5] = [
    "transaction_date",
    "description",
    "withdrawal_amount",
    "deposit_amount",
    "balance",
];

/// One transaction row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_date: NaiveDate,

    pub description: String,

    /// Money taken out of the account (never negative).
    #[serde(with = "rust_decimal::serde::float")]
    pub withdrawal_amount: Decimal,

    /// Money added to the account (never negative).
    #[serde(with = "rust_decimal::serde::float")]
    pub deposit_amount: Decimal,

    /// Running balance; negative when overdrawn.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,

    /// How the amounts were assigned to their columns. Not part of the output schema.
    #[serde(skip)]
    pub assignment: AmountAssignment,
}

/// How a line's amounts were mapped onto withdrawal/deposit/balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountAssignment {
    /// Credit/debit markers decided the columns.
    Marked,
    /// Fixed column positions decided the columns.
    Positional,
    /// Keyword guesswork on an unmarked line. Low confidence.
    Heuristic,
    /// No amounts could be assigned.
    #[default]
    Unassigned,
}

impl AmountAssignment {
    /// Whether the amounts should be double-checked by a human.
    pub fn is_low_confidence(&self) -> bool {
        matches!(self, AmountAssignment::Heuristic | AmountAssignment::Unassigned)
    }
}

impl TransactionRecord {
    /// Create a record with zero amounts.
    pub fn new(transaction_date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            transaction_date,
            description: description.into(),
            withdrawal_amount: Decimal::ZERO,
            deposit_amount: Decimal::ZERO,
            balance: Decimal::ZERO,
            assignment: AmountAssignment::Unassigned,
        }
    }

    /// Both a withdrawal and a deposit on one row.
    pub fn is_two_sided(&self) -> bool {
        !self.withdrawal_amount.is_zero() && !self.deposit_amount.is_zero()
    }
}

/// Transactions of one statement, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionTable {
    records: Vec<TransactionRecord>,
}

impl TransactionTable {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransactionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<TransactionRecord> {
        self.records
    }

    /// Sum of all withdrawals.
    pub fn total_withdrawals(&self) -> Decimal {
        self.records.iter().map(|r| r.withdrawal_amount).sum()
    }

    /// Sum of all deposits.
    pub fn total_deposits(&self) -> Decimal {
        self.records.iter().map(|r| r.deposit_amount).sum()
    }

    /// Number of rows whose amounts were guessed.
    pub fn low_confidence_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.assignment.is_low_confidence())
            .count()
    }

    /// Validate the table and return any issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.records.is_empty() {
            issues.push("No transactions".to_string());
        }

        for (i, record) in self.records.iter().enumerate() {
            if record.is_two_sided() {
                issues.push(format!(
                    "Row {} ({}) has both withdrawal {} and deposit {}",
                    i + 1,
                    record.transaction_date,
                    record.withdrawal_amount,
                    record.deposit_amount
                ));
            }
        }

        issues
    }
}

impl FromIterator<TransactionRecord> for TransactionTable {
    fn from_iter<I: IntoIterator<Item = TransactionRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TransactionTable {
    type Item = &'a TransactionRecord;
    type IntoIter = std::slice::Iter<'a, TransactionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Format an amount in Indian style: crores as `Cr`, lakhs as `L`, else `₹1,234.50`.
pub fn format_inr(amount: Decimal) -> String {
    let crore = Decimal::from(10_000_000);
    let lakh = Decimal::from(100_000);

    if amount >= crore {
        return format!("₹{:.2}Cr", (amount / crore).round_dp(2));
    }
    if amount >= lakh {
        return format!("₹{:.2}L", (amount / lakh).round_dp(2));
    }

    let s = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (integer_part, decimal_part) = digits.split_once('.').unwrap_or((digits, "00"));

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    format!("₹{}{}.{}", sign, grouped, decimal_part)
}
