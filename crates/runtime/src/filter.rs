//! User filter state for the trips map.
//!
//! The state is a single owned record. The only way to change it is an
//! explicit [`FilterUpdate`] message that replaces one field.

use foundation::date::{CalendarDate, parse_picker_date};
use streaming::query::{DEFAULT_HOUR, TileQuery};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FilterMode {
    /// `from` or `to` is missing; nothing may be queried yet.
    Incomplete,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub from: Option<CalendarDate>,
    pub to: Option<CalendarDate>,
    pub hour: u8,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            hour: DEFAULT_HOUR,
        }
    }
}

impl FilterState {
    pub fn mode(&self) -> FilterMode {
        if self.from.is_some() && self.to.is_some() {
            FilterMode::Complete
        } else {
            FilterMode::Incomplete
        }
    }
}

/// Build the tile query for a filter state, or `None` while it is incomplete.
pub fn build_query(state: &FilterState) -> Option<TileQuery> {
    let (Some(from), Some(to)) = (state.from.as_ref(), state.to.as_ref()) else {
        return None;
    };
    Some(TileQuery::for_range(from, to, state.hour))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    From(Option<CalendarDate>),
    To(Option<CalendarDate>),
    Hour(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    UnknownField(String),
    BadDate { field: &'static str, value: String },
    BadHour(String),
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterError::UnknownField(name) => write!(f, "unknown filter: {name}"),
            FilterError::BadDate { field, value } => {
                write!(f, "filter {field} expects YYYY-MM-DD, got {value:?}")
            }
            FilterError::BadHour(value) => {
                write!(f, "filter hour expects an integer in 0..=23, got {value:?}")
            }
        }
    }
}

impl std::error::Error for FilterError {}

impl FilterUpdate {
    pub fn name(&self) -> &'static str {
        match self {
            FilterUpdate::From(_) => "from",
            FilterUpdate::To(_) => "to",
            FilterUpdate::Hour(_) => "hour",
        }
    }

    /// Decode a `(name, value)` pair coming from string-typed form controls.
    ///
    /// Dates are `YYYY-MM-DD`; an empty value clears the date.
    pub fn parse(name: &str, value: &str) -> Result<Self, FilterError> {
        match name {
            "from" => parse_date_field("from", value).map(FilterUpdate::From),
            "to" => parse_date_field("to", value).map(FilterUpdate::To),
            "hour" => match value.trim().parse::<u8>() {
                Ok(h) if h <= 23 => Ok(FilterUpdate::Hour(h)),
                _ => Err(FilterError::BadHour(value.to_string())),
            },
            other => Err(FilterError::UnknownField(other.to_string())),
        }
    }
}

fn parse_date_field(field: &'static str, value: &str) -> Result<Option<CalendarDate>, FilterError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_picker_date(value)
        .map(Some)
        .map_err(|_| FilterError::BadDate {
            field,
            value: value.to_string(),
        })
}

/// Owns the filter record and applies updates to it.
#[derive(Debug, Default)]
pub struct FilterStateMachine {
    state: FilterState,
}

impl FilterStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn mode(&self) -> FilterMode {
        self.state.mode()
    }

    /// Replace exactly the field named by `update`.
    pub fn update(&mut self, update: FilterUpdate) -> &FilterState {
        match update {
            FilterUpdate::From(d) => self.state.from = d,
            FilterUpdate::To(d) => self.state.to = d,
            FilterUpdate::Hour(h) => self.state.hour = h,
        }
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FilterError, FilterMode, FilterState, FilterStateMachine, FilterUpdate, build_query,
    };
    use foundation::date::CalendarDate;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn starts_incomplete_with_default_hour() {
        let m = FilterStateMachine::new();
        assert_eq!(
            m.state(),
            &FilterState {
                from: None,
                to: None,
                hour: 9
            }
        );
        assert_eq!(m.mode(), FilterMode::Incomplete);
    }

    #[test]
    fn update_replaces_only_named_field() {
        let mut m = FilterStateMachine::new();
        m.update(FilterUpdate::From(Some(ymd(2017, 1, 1))));
        assert_eq!(m.mode(), FilterMode::Incomplete);
        assert_eq!(m.state().hour, 9);

        m.update(FilterUpdate::Hour(17));
        assert_eq!(m.state().from, Some(ymd(2017, 1, 1)));
        assert_eq!(m.state().to, None);

        m.update(FilterUpdate::To(Some(ymd(2017, 1, 2))));
        assert_eq!(m.mode(), FilterMode::Complete);

        m.update(FilterUpdate::From(None));
        assert_eq!(m.mode(), FilterMode::Incomplete);
        assert_eq!(m.state().to, Some(ymd(2017, 1, 2)));
        assert_eq!(m.state().hour, 17);
    }

    #[test]
    fn incomplete_state_builds_no_query() {
        let only_from = FilterState {
            from: Some(ymd(2017, 1, 1)),
            ..FilterState::default()
        };
        let only_to = FilterState {
            to: Some(ymd(2017, 1, 2)),
            ..FilterState::default()
        };
        assert_eq!(build_query(&FilterState::default()), None);
        assert_eq!(build_query(&only_from), None);
        assert_eq!(build_query(&only_to), None);
    }

    #[test]
    fn complete_state_builds_canonical_query() {
        let state = FilterState {
            from: Some(ymd(2017, 1, 1)),
            to: Some(ymd(2017, 1, 2)),
            hour: 9,
        };
        let q = build_query(&state).expect("complete");
        assert_eq!(q.date_from, "1.1.2017");
        assert_eq!(q.date_to, "1.2.2017");
        assert_eq!(q.to_query_string(), "date_from=1.1.2017&date_to=1.2.2017&hour=9");
        assert_eq!(
            build_query(&state.clone()).expect("complete").to_query_string(),
            q.to_query_string()
        );
    }

    #[test]
    fn parses_form_values() {
        assert_eq!(
            FilterUpdate::parse("from", "2017-01-01"),
            Ok(FilterUpdate::From(Some(ymd(2017, 1, 1))))
        );
        assert_eq!(FilterUpdate::parse("to", ""), Ok(FilterUpdate::To(None)));
        assert_eq!(FilterUpdate::parse("hour", "23"), Ok(FilterUpdate::Hour(23)));
        assert_eq!(
            FilterUpdate::parse("hour", "24"),
            Err(FilterError::BadHour("24".to_string()))
        );
        assert_eq!(
            FilterUpdate::parse("minute", "3"),
            Err(FilterError::UnknownField("minute".to_string()))
        );
        assert!(matches!(
            FilterUpdate::parse("to", "2.1.2017"),
            Err(FilterError::BadDate { field: "to", .. })
        ));
    }
}
