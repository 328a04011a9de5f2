//! ICICI Bank statement layout.
//!
//! Transaction rows look like
//! `15-06-2023 NEFT TRANSFER XYZ 5,000.00Dr 25,000.00Cr`: the last marked
//! amount is the running balance, the one before it the transaction amount.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::account::{AccountField, AccountInfo, NOT_FOUND};
use crate::models::transaction::{AmountAssignment, TransactionRecord};
use crate::statement::rules::{
    collapse_whitespace, find_marked_amounts, find_plain_amounts, split_dated_line, AmountToken,
    DateFormat, EntryMarker,
};
use crate::statement::{FieldPattern, FieldRule, Issuer, SectionMarkers, StartMarker};

use super::StatementLayout;

const MIN_TOKENS: usize = 3;

/// Keywords of transfer lines the unmarked-amount heuristic knows about.
const TRANSFER_KEYWORDS: &[&str] = &["NEFT", "ACH", "CMS"];

const BANK_NAME: &str = "ICICI Bank";
const DEFAULT_ACCOUNT_TYPE: &str = "Savings";

static FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: AccountField::AccountNumber,
        patterns: &[
            FieldPattern::group(r"Account Number\s*([0-9]+)", 1),
            FieldPattern::group(r"Savings\s+([0-9]+)", 1),
        ],
        default: NOT_FOUND,
    },
    FieldRule {
        field: AccountField::AccountHolderName,
        patterns: &[
            FieldPattern::join(r"MR\.([A-Z\s]+)&([A-Z\s]+)", &[1, 2], " & "),
            FieldPattern::group(r"Your Details With Us:\s*MR\.([A-Z\s&]+)", 1),
            FieldPattern::join(r"MR\.([A-Z\s]+)&\s*([A-Z\s]+)", &[1, 2], " & "),
            FieldPattern::join(r"MR\.([A-Z\s]+)&?\s*([A-Z\s]*)", &[1, 2], " & "),
        ],
        default: NOT_FOUND,
    },
    FieldRule {
        field: AccountField::Ifsc,
        patterns: &[FieldPattern::group(r"IFSC\s*([A-Z0-9]{11})", 1)],
        default: NOT_FOUND,
    },
    FieldRule {
        field: AccountField::Micr,
        patterns: &[FieldPattern::group(r"MICR\s*([0-9]+)", 1)],
        default: NOT_FOUND,
    },
    FieldRule {
        field: AccountField::AccountType,
        patterns: &[FieldPattern::group(r"Type of Account\s*([A-Za-z]+)", 1)],
        default: DEFAULT_ACCOUNT_TYPE,
    },
    FieldRule {
        field: AccountField::Address,
        patterns: &[
            FieldPattern::group(
                r"(?i)Your Details With Us:([\s\S]*?)(?:Your Base Branch|Summary of Account)",
                1,
            ),
            FieldPattern::group(r"(?i)MR\.[\s\S]*?(?:BHUBANESWAR|ODISHA)[\s\S]*?(\d{6})", 1),
        ],
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
        StartMarker::Contains("Statement of transactions"),
        StartMarker::Contains("Date Particulars"),
    ],
    end: &[
        "Page Total",
        "Legends for transactions",
        "For ICICI Bank Limited",
    ],
    skip: &["Page ", "Category of service", "REGD ADDRESS"],
};

/// ICICI Bank layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct IciciLayout;

impl StatementLayout for IciciLayout {
    fn issuer(&self) -> Issuer {
        Issuer::Icici
    }

    fn field_rules(&self) -> &'static [FieldRule] {
        FIELD_RULES
    }

    fn fallback_account(&self) -> AccountInfo {
        let mut info = AccountInfo::filled(NOT_FOUND);
        info.account_type = DEFAULT_ACCOUNT_TYPE.to_string();
        info.bank_name = BANK_NAME.to_string();
        info
    }

    fn section_markers(&self) -> &'static SectionMarkers {
        &SECTION_MARKERS
    }

    fn parse_line(&self, line: &str) -> Option<TransactionRecord> {
        parse_icici_line(line)
    }
}

/// Parse one ICICI transaction line.
pub fn parse_icici_line(line: &str) -> Option<TransactionRecord> {
    let line = collapse_whitespace(line);
    let dated = split_dated_line(&line, DateFormat::DashDmy, MIN_TOKENS)?;
    let body = dated.body;

    let mut record = TransactionRecord::new(dated.date, String::new());

    let marked = find_marked_amounts(body);
    let description_end = if let Some(balance) = marked.last() {
        record.balance = balance.signed_value()?;

        if marked.len() >= 2 {
            let amount = &marked[marked.len() - 2];
            match amount.marker {
                Some(EntryMarker::Debit) => record.withdrawal_amount = amount.value()?,
                _ => record.deposit_amount = amount.value()?,
            }
        }

        record.assignment = AmountAssignment::Marked;
        marked[0].start
    } else {
        // Without a marker there is no column boundary, so the description
        // keeps the whole remainder, numbers included
        let plain = find_plain_amounts(body);
        if plain.len() >= 3 {
            assign_unmarked(&line, &plain[plain.len() - 3..], &mut record);
        }
        body.len()
    };

    let description = collapse_whitespace(&body[..description_end]);
    record.description = if description.is_empty() {
        line.split(' ').skip(1).take(2).collect::<Vec<_>>().join(" ")
    } else {
        description
    };

    Some(record)
}

/// Guess columns for a line without credit/debit markers.
///
/// The three trailing numbers are read as (withdrawal, deposit, balance) but
/// transfer lines shuffle them depending on keywords. Results are tagged
/// [`AmountAssignment::Heuristic`]; a number that fails to parse leaves the
/// amounts at zero.
fn assign_unmarked(line: &str, trailing: &[AmountToken<'_>], record: &mut TransactionRecord) {
    let Some(values) = trailing
        .iter()
        .map(|t| t.value())
        .collect::<Option<Vec<Decimal>>>()
    else {
        debug!("Unparseable trailing amounts in {:?}", line);
        return;
    };
    let (first, second, last) = (values[0], values[1], values[2]);

    record.balance = last;

    if TRANSFER_KEYWORDS.iter().any(|k| line.contains(k)) {
        if line.contains("0.00") {
            record.withdrawal_amount = first;
            record.deposit_amount = second;
        } else if line.contains("B/F") {
            record.balance = first;
        } else {
            record.deposit_amount = first;
            record.balance = second;
        }
    }

    record.assignment = AmountAssignment::Heuristic;
    debug!("Amounts of {:?} assigned heuristically", line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_marked_debit_line() {
        let record = parse_icici_line("15-06-2023 NEFT TRANSFER XYZ 5,000.00Dr 25,000.00Cr").unwrap();

        assert_eq!(record.transaction_date, NaiveDate::from_ymd_opt(2023, 6, 15).unwrap());
        assert_eq!(record.withdrawal_amount, dec("5000.00"));
        assert_eq!(record.deposit_amount, Decimal::ZERO);
        assert_eq!(record.balance, dec("25000.00"));
        assert_eq!(record.description, "NEFT TRANSFER XYZ");
        assert_eq!(record.assignment, AmountAssignment::Marked);
    }

    #[test]
    fn test_marked_credit_line_with_messy_spacing() {
        let record =
            parse_icici_line("  02-07-2023   UPI/CREDIT   FROM  ABC   1,250.50 Cr   26,250.50 Cr ")
                .unwrap();

        assert_eq!(record.deposit_amount, dec("1250.50"));
        assert_eq!(record.withdrawal_amount, Decimal::ZERO);
        assert_eq!(record.balance, dec("26250.50"));
        assert_eq!(record.description, "UPI/CREDIT FROM ABC");
    }

    #[test]
    fn test_debit_balance_is_negative() {
        let record = parse_icici_line("03-07-2023 CHQ RETURN CHG 590.00Dr 120.00Dr").unwrap();
        assert_eq!(record.withdrawal_amount, dec("590.00"));
        assert_eq!(record.balance, dec("-120.00"));
    }

    #[test]
    fn test_balance_only_line() {
        let record = parse_icici_line("01-04-2023 B/F 1,00,000.00Cr").unwrap();
        assert_eq!(record.balance, dec("100000.00"));
        assert_eq!(record.withdrawal_amount, Decimal::ZERO);
        assert_eq!(record.deposit_amount, Decimal::ZERO);
        assert_eq!(record.description, "B/F");
    }

    #[test]
    fn test_unmarked_transfer_with_zero_column() {
        let record =
            parse_icici_line("01-04-2023 NEFT-SALARY ACME 0.00 45,000.00 1,20,000.00").unwrap();

        assert_eq!(record.withdrawal_amount, Decimal::ZERO);
        assert_eq!(record.deposit_amount, dec("45000.00"));
        assert_eq!(record.balance, dec("120000.00"));
        assert_eq!(record.description, "NEFT-SALARY ACME 0.00 45,000.00 1,20,000.00");
        assert_eq!(record.assignment, AmountAssignment::Heuristic);
        assert!(record.assignment.is_low_confidence());
    }

    #[test]
    fn test_unmarked_brought_forward() {
        let record = parse_icici_line("01-04-2023 CMS B/F 15,500.50 100 200").unwrap();
        assert_eq!(record.balance, dec("15500.50"));
        assert_eq!(record.withdrawal_amount, Decimal::ZERO);
        assert_eq!(record.deposit_amount, Decimal::ZERO);
    }

    #[test]
    fn test_unmarked_transfer_reads_deposit_then_balance() {
        let record =
            parse_icici_line("03-04-2023 ACH DEBIT INSURANCE 2,500.75 13,000.25 999").unwrap();
        assert_eq!(record.deposit_amount, dec("2500.75"));
        assert_eq!(record.balance, dec("13000.25"));
        assert_eq!(record.withdrawal_amount, Decimal::ZERO);
    }

    #[test]
    fn test_unmarked_without_keyword_keeps_balance_only() {
        let record = parse_icici_line("04-04-2023 CASH DEPOSIT 500 1,000 2,000").unwrap();
        assert_eq!(record.balance, dec("2000"));
        assert_eq!(record.withdrawal_amount, Decimal::ZERO);
        assert_eq!(record.deposit_amount, Decimal::ZERO);
        assert_eq!(record.assignment, AmountAssignment::Heuristic);
        assert_eq!(record.description, "CASH DEPOSIT 500 1,000 2,000");
    }

    #[test]
    fn test_line_without_amounts() {
        let record = parse_icici_line("05-04-2023 INTEREST CREDIT 45").unwrap();
        assert_eq!(record.description, "INTEREST CREDIT 45");
        assert_eq!(record.assignment, AmountAssignment::Unassigned);
    }

    #[test]
    fn test_rejects_lines_without_leading_date() {
        assert!(parse_icici_line("Opening Balance 1,000.00Cr 2,000.00Cr").is_none());
        assert!(parse_icici_line("2023-06-15 NEFT 5,000.00Dr 25,000.00Cr").is_none());
        assert!(parse_icici_line("15/06/2023 NEFT 5,000.00Dr 25,000.00Cr").is_none());
        assert!(parse_icici_line("31-04-2023 NEFT 5,000.00Dr 25,000.00Cr").is_none());
    }

    #[test]
    fn test_rejects_short_lines() {
        assert!(parse_icici_line("15-06-2023 5.00Cr").is_none());
        assert!(parse_icici_line("").is_none());
    }

    #[test]
    fn test_rejects_malformed_marked_amount() {
        assert!(parse_icici_line("15-06-2023 FEE , Dr 100.00Cr").is_none());
    }

    #[test]
    fn test_accepted_date_round_trips() {
        let token = "09-11-2022";
        let record = parse_icici_line(&format!("{} ATM WDL 2,000.00Dr 8,000.00Cr", token)).unwrap();
        assert_eq!(DateFormat::DashDmy.format(record.transaction_date), token);
    }

    #[test]
    fn test_fallback_account_is_total() {
        let info = IciciLayout.fallback_account();
        assert_eq!(info.bank_name, "ICICI Bank");
        assert_eq!(info.account_type, "Savings");
        assert_eq!(info.ifsc, NOT_FOUND);
    }
}
