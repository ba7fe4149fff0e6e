//! Parsing and display of article dates.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, ParseError};

/// The date assumed for articles whose frontmatter has none.
pub const DEFAULT_DATE: &str = "1970-01-01T00:00:00";

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Parses an article date. Accepts a full timestamp or a bare date, which is
/// taken as midnight.
pub fn parse(input: &str) -> Result<NaiveDateTime, ParseError> {
    let input = input.trim();
    for format in DATE_TIME_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(date_time);
        }
    }
    let date = NaiveDate::parse_from_str(input, DATE_FORMAT)?;
    Ok(date.and_time(NaiveTime::MIN))
}

/// Formats a date as day, short month and year (e.g., `5 Agu 2024`).
pub fn format_long(date: &NaiveDateTime) -> String {
    format!("{} {}", format_short(date), date.year())
}

/// Formats a date as day and short month (e.g., `5 Agu`).
pub fn format_short(date: &NaiveDateTime) -> String {
    format!("{} {}", date.day(), MONTHS[date.month0() as usize])
}

/// Formats a date the way `<time datetime>` and the sitemap expect.
pub fn format_iso(date: &NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .unwrap()
    }

    #[test]
    fn test_parse_formats() -> Result<(), ParseError> {
        let wanted = at(2024, 8, 5, 13, 30);
        assert_eq!(wanted, parse("2024-08-05T13:30:00")?);
        assert_eq!(wanted, parse("2024-08-05 13:30:00")?);
        assert_eq!(
            at(2024, 8, 5, 0, 0),
            parse(" 2024-08-05 ")?
        );
        Ok(())
    }

    #[test]
    fn test_parse_default() -> Result<(), ParseError> {
        assert_eq!(at(1970, 1, 1, 0, 0), parse(DEFAULT_DATE)?);
        Ok(())
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse("kemarin").is_err());
    }

    #[test]
    fn test_format() {
        let date = at(2024, 8, 5, 0, 0);
        assert_eq!("5 Agu 2024", format_long(&date));
        assert_eq!("5 Agu", format_short(&date));
        assert_eq!("2024-08-05", format_iso(&date));
    }
}
