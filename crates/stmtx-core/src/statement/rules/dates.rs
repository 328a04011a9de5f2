//! Leading date tokens of transaction lines.

use chrono::NaiveDate;

use super::patterns::{DATE_DASH_DMY, DATE_SLASH_DMY};

/// Two-digit years below this are 20xx, the rest 19xx.
const TWO_DIGIT_YEAR_PIVOT: i32 = 69;

/// Date format of a statement layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `DD-MM-YYYY`
    DashDmy,
    /// `D/M/YY` or `D/M/YYYY`
    SlashDmy,
}

impl DateFormat {
    /// Parse a whole token as a calendar date in this format.
    pub fn parse(&self, token: &str) -> Option<NaiveDate> {
        let caps = match self {
            DateFormat::DashDmy => DATE_DASH_DMY.captures(token)?,
            DateFormat::SlashDmy => DATE_SLASH_DMY.captures(token)?,
        };

        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year = parse_year(&caps[3])?;

        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Render a date in this format (four-digit year).
    pub fn format(&self, date: NaiveDate) -> String {
        match self {
            DateFormat::DashDmy => date.format("%d-%m-%Y").to_string(),
            DateFormat::SlashDmy => date.format("%d/%m/%Y").to_string(),
        }
    }
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() == 2 {
        if year < TWO_DIGIT_YEAR_PIVOT {
            Some(2000 + year)
        } else {
            Some(1900 + year)
        }
    } else {
        Some(year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dash_dmy() {
        assert_eq!(
            DateFormat::DashDmy.parse("15-06-2023"),
            NaiveDate::from_ymd_opt(2023, 6, 15)
        );
        assert_eq!(DateFormat::DashDmy.parse("31-02-2023"), None);
        assert_eq!(DateFormat::DashDmy.parse("2023-06-15"), None);
        assert_eq!(DateFormat::DashDmy.parse("15/06/2023"), None);
    }

    #[test]
    fn test_parse_slash_dmy() {
        assert_eq!(
            DateFormat::SlashDmy.parse("12/5/23"),
            NaiveDate::from_ymd_opt(2023, 5, 12)
        );
        assert_eq!(
            DateFormat::SlashDmy.parse("01/12/2022"),
            NaiveDate::from_ymd_opt(2022, 12, 1)
        );
        assert_eq!(DateFormat::SlashDmy.parse("13/13/23"), None);
        assert_eq!(DateFormat::SlashDmy.parse("15-06-2023"), None);
    }

    #[test]
    fn test_two_digit_year_pivot() {
        assert_eq!(
            DateFormat::SlashDmy.parse("1/1/68"),
            NaiveDate::from_ymd_opt(2068, 1, 1)
        );
        assert_eq!(
            DateFormat::SlashDmy.parse("1/1/69"),
            NaiveDate::from_ymd_opt(1969, 1, 1)
        );
    }

    #[test]
    fn test_format_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        for format in [DateFormat::DashDmy, DateFormat::SlashDmy] {
            assert_eq!(format.parse(&format.format(date)), Some(date));
        }
        assert_eq!(DateFormat::DashDmy.format(date), "29-02-2024");
    }
}
