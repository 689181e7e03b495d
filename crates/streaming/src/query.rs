//! Tile query parameters for the trips tile function.
//!
//! A [`TileQuery`] is the only thing that changes between tile fetches: the
//! layer definitions stay fixed and the source URL is rebuilt from the query.

use foundation::date::{CalendarDate, format_date};
use serde::{Deserialize, Serialize};

/// Hour requested when the user has not picked one.
pub const DEFAULT_HOUR: u8 = 9;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileQuery {
    pub date_from: String,
    pub date_to: String,
    pub hour: u8,
}

impl TileQuery {
    pub fn for_range(from: &CalendarDate, to: &CalendarDate, hour: u8) -> Self {
        Self {
            date_from: format_date(from),
            date_to: format_date(to),
            hour,
        }
    }

    /// Query installed before the user touches any filter.
    ///
    /// The zero-padded dates match the URL the map has always shipped with;
    /// the tile function reads them as January 1st through February 1st 2017.
    pub fn fallback() -> Self {
        Self {
            date_from: "01.01.2017".to_string(),
            date_to: "02.01.2017".to_string(),
            hour: DEFAULT_HOUR,
        }
    }

    /// Serialize as `date_from=..&date_to=..&hour=..`, always in that order.
    ///
    /// Values are URI-encoded whole, so the dots of the date format are kept
    /// literally and equal queries always give byte-identical strings.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("date_from", &self.date_from)
            .append_pair("date_to", &self.date_to)
            .append_pair("hour", &self.hour.to_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::TileQuery;
    use foundation::date::CalendarDate;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn serializes_in_fixed_order() {
        let q = TileQuery::for_range(&ymd(2017, 1, 1), &ymd(2017, 1, 2), 9);
        assert_eq!(q.to_query_string(), "date_from=1.1.2017&date_to=1.2.2017&hour=9");
    }

    #[test]
    fn equal_queries_serialize_identically() {
        let a = TileQuery::for_range(&ymd(2017, 11, 30), &ymd(2018, 1, 15), 23);
        let b = TileQuery::for_range(&ymd(2017, 11, 30), &ymd(2018, 1, 15), 23);
        assert_eq!(a.to_query_string().as_bytes(), b.to_query_string().as_bytes());
        assert_eq!(a.to_query_string(), "date_from=11.30.2017&date_to=1.15.2018&hour=23");
    }

    #[test]
    fn fallback_matches_shipped_url() {
        assert_eq!(
            TileQuery::fallback().to_query_string(),
            "date_from=01.01.2017&date_to=02.01.2017&hour=9"
        );
    }

    #[test]
    fn hour_zero_is_kept() {
        let q = TileQuery::for_range(&ymd(2017, 6, 1), &ymd(2017, 6, 1), 0);
        assert!(q.to_query_string().ends_with("&hour=0"));
    }
}
