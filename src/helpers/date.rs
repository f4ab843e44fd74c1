//! Date helper functions

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use std::fmt::Write;

/// Format a date using a Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "YYYY.MM.DD.") // -> "2021.01.01."
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let chrono_format = moment_to_chrono_format(format);
    let mut formatted = String::new();
    if write!(formatted, "{}", date.format(&chrono_format)).is_err() {
        tracing::warn!("Invalid date format {:?}, using YYYY-MM-DD", format);
        return date.format("%Y-%m-%d").to_string();
    }
    formatted
}

/// Check that a Moment.js-style format can be rendered
pub fn check_date_format(format: &str) -> anyhow::Result<()> {
    let chrono_format = moment_to_chrono_format(format);
    if StrftimeItems::new(&chrono_format).any(|item| matches!(item, Item::Error)) {
        anyhow::bail!("Unsupported date format {:?}", format);
    }
    Ok(())
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest tokens first within each unit
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
        ("ZZ", "%z"),
    ];

    // Literal percent signs must not start a chrono specifier
    let mut result = format.replace('%', "%%");

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2021, 1, 1, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date, "YYYY.MM.DD."), "2021.01.01.");
        assert_eq!(format_date(&date, "YYYY-MM-DD"), "2021-01-01");
    }

    #[test]
    fn test_format_date_keeps_literal_percent() {
        let date = Utc.with_ymd_and_hms(2021, 1, 1, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date, "YYYY.MM.DD. 100%"), "2021.01.01. 100%");
        assert_eq!(format_date(&date, "%Y"), "%Y");
    }

    #[test]
    fn test_check_date_format() {
        assert!(check_date_format("YYYY.MM.DD.").is_ok());
        assert!(check_date_format("YYYY.MM.DD. 100%").is_ok());
        assert!(check_date_format("%").is_ok());
    }

    #[test]
    fn test_date_xml() {
        let date = Utc.with_ymd_and_hms(2021, 1, 1, 10, 30, 0).unwrap();
        assert_eq!(date_xml(&date), "2021-01-01T10:30:00+00:00");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY.MM.DD."), "%Y.%m.%d.");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
        assert_eq!(moment_to_chrono_format("DD 50%"), "%d 50%%");
    }
}
