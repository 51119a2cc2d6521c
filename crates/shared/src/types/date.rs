//! Calendar date parsing for ledger cells.

use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// Parses a date cell.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY.MM.DD`, `YYYYMMDD`, and
/// datetimes in the same orderings, whose date part is used. Returns `None`
/// for blank cells and for dates that do not exist on the calendar.
#[must_use]
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
                .map(|datetime| datetime.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("2023-12-31")]
    #[case("2023/12/31")]
    #[case("2023.12.31")]
    #[case("20231231")]
    #[case(" 2023-12-31 ")]
    #[case("2023-12-31T09:30:00")]
    #[case("2023-12-31 23:59:59")]
    fn test_parse_date_formats(#[case] cell: &str) {
        assert_eq!(parse_date(cell), Some(ymd(2023, 12, 31)));
    }

    #[rstest]
    #[case("")]
    #[case("2023-02-30")]
    #[case("2023-13-01")]
    #[case("31/12/2023")]
    #[case("yesterday")]
    fn test_parse_date_rejects(#[case] cell: &str) {
        assert_eq!(parse_date(cell), None);
    }
}
