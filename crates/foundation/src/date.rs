use chrono::{Datelike, NaiveDate};

/// Calendar dates used by filters are plain days without a time zone.
pub type CalendarDate = NaiveDate;

/// Render a calendar date as `month.day.year` with no zero padding.
///
/// The trips tile function parses exactly this form (`1.2.2017` is
/// January 2nd), so it must not be swapped for ISO-8601.
pub fn format_date<D: Datelike>(date: &D) -> String {
    format!("{}.{}.{}", date.month(), date.day(), date.year())
}

/// Parse the `YYYY-MM-DD` form emitted by date pickers.
pub fn parse_picker_date(s: &str) -> Result<CalendarDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
}

#[cfg(test)]
mod tests {
    use super::{CalendarDate, format_date, parse_picker_date};

    fn ymd(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn formats_month_day_year_unpadded() {
        assert_eq!(format_date(&ymd(2017, 1, 2)), "1.2.2017");
        assert_eq!(format_date(&ymd(2017, 1, 1)), "1.1.2017");
    }

    #[test]
    fn keeps_multi_digit_components() {
        assert_eq!(format_date(&ymd(2018, 12, 31)), "12.31.2018");
        assert_eq!(format_date(&ymd(2017, 10, 5)), "10.5.2017");
    }

    #[test]
    fn parses_picker_dates() {
        assert_eq!(parse_picker_date("2017-01-02").expect("parse"), ymd(2017, 1, 2));
        assert_eq!(parse_picker_date(" 2017-03-04 ").expect("parse"), ymd(2017, 3, 4));
        assert!(parse_picker_date("1.2.2017").is_err());
        assert!(parse_picker_date("2017-02-30").is_err());
    }
}
