//! HDFC Bank statement layout.
//!
//! Rows carry no credit/debit markers; the three trailing numbers are always
//! withdrawal, deposit and closing balance.

use crate::models::account::{AccountField, AccountInfo, NOT_FOUND};
use crate::models::transaction::{AmountAssignment, TransactionRecord};
use crate::statement::rules::{collapse_whitespace, find_plain_amounts, split_dated_line, DateFormat};
use crate::statement::{FieldPattern, FieldRule, Issuer, SectionMarkers, StartMarker};

use super::StatementLayout;

const MIN_TOKENS: usize = 4;

const BANK_NAME: &str = "HDFC Bank";

static FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: AccountField::AccountNumber,
        patterns: &[FieldPattern::group(r"(?i)Account No\.?\s*:?\s*([\dX]+)", 1)],
        default: NOT_FOUND,
    },
    FieldRule {
        field: AccountField::AccountHolderName,
        patterns: &[FieldPattern::group(
            r"MR\s+([A-Z\s]+)(?:\n|JOINT HOLDERS|Account Branch)",
            1,
        )],
        default: NOT_FOUND,
    },
    FieldRule {
        field: AccountField::Ifsc,
        patterns: &[FieldPattern::group(r"(?i)IFSC:?\s*([A-Z0-9]{11})", 1)],
        default: NOT_FOUND,
    },
    FieldRule {
        field: AccountField::Micr,
        patterns: &[FieldPattern::group(r"(?i)MICR:?\s*(\d{9})", 1)],
        default: NOT_FOUND,
    },
    FieldRule {
        field: AccountField::AccountType,
        patterns: &[],
        default: "Savings",
    },
    FieldRule {
        field: AccountField::Address,
        patterns: &[FieldPattern::group(
            r"(?s)Address\s*:?\s*(.+?)(?:\nCity|\nState|\nPhone|$)",
            1,
        )],
        default: NOT_FOUND,
    },
    FieldRule {
        field: AccountField::BankName,
        patterns: &[],
        default: BANK_NAME,
    },
];

static SECTION_MARKERS: SectionMarkers = SectionMarkers {
    start: &[
        StartMarker::Contains("Statement of account"),
        StartMarker::ContainsAll(&["Date", "Narration"]),
    ],
    end: &["HDFC BANK LIMITED", "Page Total", "Statement Summary"],
    skip: &["Page No.", "H HDFC BANK"],
};

/// HDFC Bank layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct HdfcLayout;

impl StatementLayout for HdfcLayout {
    fn issuer(&self) -> Issuer {
        Issuer::Hdfc
    }

    fn field_rules(&self) -> &'static [FieldRule] {
        FIELD_RULES
    }

    fn fallback_account(&self) -> AccountInfo {
        let mut info = AccountInfo::filled("Error");
        info.bank_name = BANK_NAME.to_string();
        info
    }

    fn section_markers(&self) -> &'static SectionMarkers {
        &SECTION_MARKERS
    }

    fn parse_line(&self, line: &str) -> Option<TransactionRecord> {
        parse_hdfc_line(line)
    }
}

/// Parse one HDFC transaction line.
pub fn parse_hdfc_line(line: &str) -> Option<TransactionRecord> {
    let line = collapse_whitespace(line);
    let dated = split_dated_line(&line, DateFormat::SlashDmy, MIN_TOKENS)?;
    let body = dated.body;

    let amounts = find_plain_amounts(body);
    if amounts.len() < 3 {
        return None;
    }

    let trailing = &amounts[amounts.len() - 3..];
    let description = collapse_whitespace(&body[..trailing[0].start]);

    let mut record = TransactionRecord::new(dated.date, description);
    record.withdrawal_amount = trailing[0].value()?;
    record.deposit_amount = trailing[1].value()?;
    record.balance = trailing[2].value()?;
    record.assignment = AmountAssignment::Positional;

    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_positional_amounts() {
        let record = parse_hdfc_line("12/5/23 RTGS INWARD 0.00 50000.00 150000.00").unwrap();

        assert_eq!(record.transaction_date, NaiveDate::from_ymd_opt(2023, 5, 12).unwrap());
        assert_eq!(record.withdrawal_amount, Decimal::ZERO);
        assert_eq!(record.deposit_amount, dec("50000.00"));
        assert_eq!(record.balance, dec("150000.00"));
        assert_eq!(record.description, "RTGS INWARD");
        assert_eq!(record.assignment, AmountAssignment::Positional);
    }

    #[test]
    fn test_reference_numbers_stay_in_description() {
        let record =
            parse_hdfc_line("03/04/2023 UPI-4521887 GROCERY   1,250.00 0.00 48,750.00").unwrap();

        assert_eq!(record.transaction_date, NaiveDate::from_ymd_opt(2023, 4, 3).unwrap());
        assert_eq!(record.description, "UPI-4521887 GROCERY");
        assert_eq!(record.withdrawal_amount, dec("1250.00"));
        assert_eq!(record.balance, dec("48750.00"));
    }

    #[test]
    fn test_two_digit_year_pivot() {
        let recent = parse_hdfc_line("1/1/68 OPENING 0 0 10").unwrap();
        let old = parse_hdfc_line("1/1/69 OPENING 0 0 10").unwrap();

        assert_eq!(recent.transaction_date, NaiveDate::from_ymd_opt(2068, 1, 1).unwrap());
        assert_eq!(old.transaction_date, NaiveDate::from_ymd_opt(1969, 1, 1).unwrap());
    }

    #[test]
    fn test_rejects_too_few_numbers() {
        assert!(parse_hdfc_line("12/5/23 CHARGES REVERSAL 10.00 20.00").is_none());
    }

    #[test]
    fn test_rejects_short_and_undated_lines() {
        assert!(parse_hdfc_line("12/5/23 0.00 1.00").is_none());
        assert!(parse_hdfc_line("Opening Balance 0.00 1.00 2.00").is_none());
        assert!(parse_hdfc_line("12-05-2023 RTGS 0.00 1.00 2.00").is_none());
        assert!(parse_hdfc_line("30/2/23 RTGS 0.00 1.00 2.00").is_none());
    }

    #[test]
    fn test_accepted_date_round_trips() {
        let record = parse_hdfc_line("07/09/2022 ATM WDL 500.00 0.00 9,500.00").unwrap();
        assert_eq!(DateFormat::SlashDmy.format(record.transaction_date), "07/09/2022");
    }

    #[test]
    fn test_fallback_account_marks_errors() {
        let info = HdfcLayout.fallback_account();
        assert_eq!(info.bank_name, "HDFC Bank");
        assert_eq!(info.account_number, "Error");
        assert_eq!(info.address, "Error");
    }
}
