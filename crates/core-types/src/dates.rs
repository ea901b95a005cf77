use chrono::{NaiveDate, NaiveDateTime};

/// Formats tried, in order, when no explicit list is configured.
pub const DEFAULT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

// Timestamps written by spreadsheet tools; only the date part is kept.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parses a calendar date from text, trying each format in turn.
///
/// Blank or unrecognised input yields `None` rather than an error so that a
/// single malformed cell degrades to "absent" instead of failing a batch.
pub fn parse_date<S: AsRef<str>>(text: &str, formats: &[S]) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt.as_ref()).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_each_default_format() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        for text in ["2024-03-09", "09/03/2024", "09-03-2024", "2024/03/09"] {
            assert_eq!(parse_date(text, DEFAULT_DATE_FORMATS), expected, "{text}");
        }
    }

    #[test]
    fn test_datetime_keeps_date_part() {
        assert_eq!(
            parse_date("2024-03-09 00:00:00", DEFAULT_DATE_FORMATS),
            NaiveDate::from_ymd_opt(2024, 3, 9)
        );
    }

    #[test]
    fn test_unparseable_is_absent() {
        assert_eq!(parse_date("", DEFAULT_DATE_FORMATS), None);
        assert_eq!(parse_date("  ", DEFAULT_DATE_FORMATS), None);
        assert_eq!(parse_date("31/02/2024", DEFAULT_DATE_FORMATS), None);
        assert_eq!(parse_date("next tuesday", DEFAULT_DATE_FORMATS), None);
    }

    #[test]
    fn test_respects_configured_formats() {
        let only_iso = ["%Y-%m-%d"];
        assert_eq!(parse_date("09/03/2024", &only_iso), None);
    }
}
