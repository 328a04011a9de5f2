//! Common regex patterns for statement line parsing.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Whitespace runs
    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    // ICICI dates: 15-06-2023
    pub static ref DATE_DASH_DMY: Regex = Regex::new(
        r"^(\d{2})-(\d{2})-(\d{4})$"
    ).unwrap();

    // HDFC dates: 12/5/23 or 12/05/2023
    pub static ref DATE_SLASH_DMY: Regex = Regex::new(
        r"^(\d{1,2})/(\d{1,2})/(\d{2}|\d{4})$"
    ).unwrap();

    // Amount followed by a credit/debit marker: 5,000.00Dr, 25,000.00 Cr
    pub static ref MARKED_AMOUNT: Regex = Regex::new(
        r"([0-9,]+\.?[0-9]*)\s*(Cr|Dr)"
    ).unwrap();

    // Bare number with optional thousands separators and decimals
    pub static ref PLAIN_AMOUNT: Regex = Regex::new(
        r"[0-9,]+\.?[0-9]*"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_patterns_anchor_whole_token() {
        assert!(DATE_DASH_DMY.is_match("15-06-2023"));
        assert!(!DATE_DASH_DMY.is_match("15-06-2023x"));
        assert!(!DATE_DASH_DMY.is_match("5-06-2023"));

        assert!(DATE_SLASH_DMY.is_match("1/5/23"));
        assert!(DATE_SLASH_DMY.is_match("01/05/2023"));
        assert!(!DATE_SLASH_DMY.is_match("01/05/202"));
    }

    #[test]
    fn test_marked_amount_captures() {
        let caps: Vec<(String, String)> = MARKED_AMOUNT
            .captures_iter("X 5,000.00Dr 25,000.00 Cr")
            .map(|c| (c[1].to_string(), c[2].to_string()))
            .collect();

        assert_eq!(
            caps,
            vec![
                ("5,000.00".to_string(), "Dr".to_string()),
                ("25,000.00".to_string(), "Cr".to_string()),
            ]
        );
    }
}
