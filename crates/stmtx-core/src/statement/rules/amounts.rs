//! Monetary tokens in statement lines.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{MARKED_AMOUNT, PLAIN_AMOUNT};

/// Credit/debit marker following an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMarker {
    /// `Cr`: money added to the account.
    Credit,
    /// `Dr`: money taken out of the account.
    Debit,
}

/// A numeric token found in a line, with its byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountToken<'a> {
    /// Raw digits as written, separators included.
    pub raw: &'a str,
    pub start: usize,
    pub end: usize,
    /// Marker, for tokens matched with one.
    pub marker: Option<EntryMarker>,
}

impl AmountToken<'_> {
    /// Parsed value; `None` for tokens such as a lone `,`.
    pub fn value(&self) -> Option<Decimal> {
        parse_amount(self.raw)
    }

    /// Value with the marker applied: debits are negative.
    pub fn signed_value(&self) -> Option<Decimal> {
        let value = self.value()?;
        match self.marker {
            Some(EntryMarker::Debit) => Some(-value),
            _ => Some(value),
        }
    }
}

/// Find amounts carrying a `Cr`/`Dr` marker, in line order.
pub fn find_marked_amounts(text: &str) -> Vec<AmountToken<'_>> {
    MARKED_AMOUNT
        .captures_iter(text)
        .filter_map(|caps| {
            let number = caps.get(1)?;
            let marker = match caps.get(2)?.as_str() {
                "Dr" => EntryMarker::Debit,
                _ => EntryMarker::Credit,
            };
            Some(AmountToken {
                raw: number.as_str(),
                start: number.start(),
                end: number.end(),
                marker: Some(marker),
            })
        })
        .collect()
}

/// Find every bare numeric token, in line order.
pub fn find_plain_amounts(text: &str) -> Vec<AmountToken<'_>> {
    PLAIN_AMOUNT
        .find_iter(text)
        .map(|m| AmountToken {
            raw: m.as_str(),
            start: m.start(),
            end: m.end(),
            marker: None,
        })
        .collect()
}

/// Parse an amount written with `,` thousands separators (e.g. "1,50,000.00").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.strip_suffix('.').unwrap_or(&cleaned);

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("5,000.00"), Some(dec("5000.00")));
        assert_eq!(parse_amount("1,50,000.50"), Some(dec("150000.50")));
        assert_eq!(parse_amount("42"), Some(dec("42")));
        assert_eq!(parse_amount("42."), Some(dec("42")));
        assert_eq!(parse_amount(","), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_find_marked_amounts() {
        let line = " NEFT TRANSFER XYZ 5,000.00Dr 25,000.00Cr";
        let amounts = find_marked_amounts(line);

        assert_eq!(amounts.len(), 2);
        assert_eq!(amounts[0].raw, "5,000.00");
        assert_eq!(amounts[0].marker, Some(EntryMarker::Debit));
        assert_eq!(&line[..amounts[0].start], " NEFT TRANSFER XYZ ");
        assert_eq!(amounts[1].signed_value(), Some(dec("25000.00")));
    }

    #[test]
    fn test_debit_balance_is_negative() {
        let amounts = find_marked_amounts("BAL 1,200.00 Dr");
        assert_eq!(amounts[0].signed_value(), Some(dec("-1200.00")));
    }

    #[test]
    fn test_find_plain_amounts_spans() {
        let line = " RTGS INWARD 0.00 50000.00 150000.00";
        let amounts = find_plain_amounts(line);

        let raws: Vec<&str> = amounts.iter().map(|a| a.raw).collect();
        assert_eq!(raws, vec!["0.00", "50000.00", "150000.00"]);
        assert_eq!(&line[amounts[0].start..amounts[0].end], "0.00");
        assert!(amounts.iter().all(|a| a.marker.is_none()));
    }
}
