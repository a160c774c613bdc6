//! Filter specification shared by every filtered list page.
//!
//! A [`FilterSpec`] describes which optional predicates apply to a list query
//! (status equality, free-text search) together with the requested page. It
//! is built once per request and handed to the repository layer, which turns
//! it into a parameterized `WHERE` clause.

use std::fmt::Debug;

use chrono::{Days, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::domain::types::SearchTerm;

/// Closed set of stored status strings for one record type.
pub trait StatusEnum: Copy + Debug + Eq + Send + Sync + 'static {
    /// Entity name used in error messages.
    const ENTITY: &'static str;
    /// Every variant, in display order.
    const ALL: &'static [Self];

    /// Exact string stored in the datastore for this variant.
    fn as_str(self) -> &'static str;

    /// Parses a stored string back into a variant.
    fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|status| status.as_str() == raw)
    }
}

/// Malformed filter or pagination input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown {entity} status filter: {value}")]
    UnknownStatus { entity: &'static str, value: String },
    #[error("unknown filter value for {field}: {value}")]
    UnknownValue { field: &'static str, value: String },
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// Status predicate of a list query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S: StatusEnum> StatusFilter<S> {
    /// Parses the `status` request parameter; missing, blank and `all` mean no predicate.
    pub fn parse(raw: Option<&str>) -> Result<Self, FilterError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(StatusFilter::All),
            Some(value) if value.eq_ignore_ascii_case("all") => Ok(StatusFilter::All),
            Some(value) => S::parse(value)
                .map(StatusFilter::Only)
                .ok_or_else(|| FilterError::UnknownStatus {
                    entity: S::ENTITY,
                    value: value.to_string(),
                }),
        }
    }

    /// Returns the selected status, if any.
    pub fn selected(&self) -> Option<S> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(*status),
        }
    }

    /// Value echoed back to the UI filter control.
    pub fn as_param(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

/// Criteria narrowing a list query plus pagination parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterSpec<S> {
    pub status: StatusFilter<S>,
    pub search: Option<SearchTerm>,
    pub page: usize,
    pub page_size: usize,
}

impl<S: StatusEnum> FilterSpec<S> {
    /// Creates a spec matching every record, first page.
    pub fn new(page_size: usize) -> Result<Self, FilterError> {
        if page_size == 0 {
            return Err(FilterError::ZeroPageSize);
        }
        Ok(Self {
            status: StatusFilter::All,
            search: None,
            page: 1,
            page_size,
        })
    }

    /// Builds a spec from raw request parameters.
    pub fn from_params(
        status: Option<&str>,
        search: Option<&str>,
        page: Option<&str>,
        page_size: usize,
    ) -> Result<Self, FilterError> {
        Ok(Self::new(page_size)?
            .status(StatusFilter::parse(status)?)
            .search(SearchTerm::parse(search))
            .page(parse_page(page)))
    }

    pub fn status(mut self, status: StatusFilter<S>) -> Self {
        self.status = status;
        self
    }

    pub fn search(mut self, search: Option<SearchTerm>) -> Self {
        self.search = search;
        self
    }

    /// Sets the requested page; zero is lifted to the first page.
    pub fn page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }
}

/// Lenient page parsing: anything that is not a positive integer is page 1.
pub fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|page| *page > 0)
        .map(|page| usize::try_from(page).unwrap_or(usize::MAX))
        .unwrap_or(1)
}

/// Relative creation-date filter offered on the incident list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateRange {
    Today,
    Yesterday,
    Week,
    Month,
}

/// Half-open `[start, end)` interval; an open end means "until now".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    pub const ALL: &'static [DateRange] = &[
        DateRange::Today,
        DateRange::Yesterday,
        DateRange::Week,
        DateRange::Month,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DateRange::Today => "today",
            DateRange::Yesterday => "yesterday",
            DateRange::Week => "week",
            DateRange::Month => "month",
        }
    }

    /// Parses the `date` request parameter; missing, blank and `all` mean no predicate.
    pub fn parse_filter(raw: Option<&str>) -> Result<Option<Self>, FilterError> {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(value) => Self::ALL
                .iter()
                .copied()
                .find(|range| range.as_str() == value)
                .map(Some)
                .ok_or_else(|| FilterError::UnknownValue {
                    field: "date",
                    value: value.to_string(),
                }),
        }
    }

    /// Calendar days for today/yesterday, a rolling window for week/month.
    pub fn window(self, now: NaiveDateTime) -> TimeWindow {
        let midnight = now.date().and_time(NaiveTime::MIN);
        match self {
            DateRange::Today => TimeWindow {
                start: midnight,
                end: None,
            },
            DateRange::Yesterday => TimeWindow {
                start: midnight - Days::new(1),
                end: Some(midnight),
            },
            DateRange::Week => TimeWindow {
                start: now - Days::new(7),
                end: None,
            },
            DateRange::Month => TimeWindow {
                start: now - Days::new(30),
                end: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::volunteer::VolunteerStatus;

    #[test]
    fn missing_and_all_status_mean_no_predicate() {
        assert_eq!(
            StatusFilter::<VolunteerStatus>::parse(None),
            Ok(StatusFilter::All)
        );
        assert_eq!(
            StatusFilter::<VolunteerStatus>::parse(Some("all")),
            Ok(StatusFilter::All)
        );
        assert_eq!(
            StatusFilter::<VolunteerStatus>::parse(Some("  ")),
            Ok(StatusFilter::All)
        );
    }

    #[test]
    fn known_status_is_selected() {
        let filter = StatusFilter::<VolunteerStatus>::parse(Some("On Leave")).unwrap();
        assert_eq!(filter.selected(), Some(VolunteerStatus::OnLeave));
        assert_eq!(filter.as_param(), "On Leave");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = StatusFilter::<VolunteerStatus>::parse(Some("Retired")).unwrap_err();
        assert_eq!(
            err,
            FilterError::UnknownStatus {
                entity: "volunteer",
                value: "Retired".to_string()
            }
        );
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert_eq!(
            FilterSpec::<VolunteerStatus>::new(0),
            Err(FilterError::ZeroPageSize)
        );
    }

    #[test]
    fn page_parsing_is_lenient() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("-4")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some(" 7 ")), 7);
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2026, 3, day)
            .and_then(|d| d.and_hms_opt(hour, 30, 0))
            .unwrap()
    }

    #[test]
    fn date_range_parsing() {
        assert_eq!(DateRange::parse_filter(None), Ok(None));
        assert_eq!(DateRange::parse_filter(Some("all")), Ok(None));
        assert_eq!(DateRange::parse_filter(Some(" week ")), Ok(Some(DateRange::Week)));
        assert_eq!(
            DateRange::parse_filter(Some("decade")),
            Err(FilterError::UnknownValue {
                field: "date",
                value: "decade".to_string()
            })
        );
    }

    #[test]
    fn date_range_windows() {
        let now = at(10, 14);
        let midnight = at(10, 0) - chrono::Duration::minutes(30);

        assert_eq!(
            DateRange::Today.window(now),
            TimeWindow {
                start: midnight,
                end: None
            }
        );
        assert_eq!(
            DateRange::Yesterday.window(now),
            TimeWindow {
                start: midnight - Days::new(1),
                end: Some(midnight)
            }
        );
        assert_eq!(DateRange::Week.window(now).start, at(3, 14));
        assert_eq!(DateRange::Month.window(now).start, at(10, 14) - Days::new(30));
    }

    #[test]
    fn from_params_collects_everything() {
        let spec = FilterSpec::<VolunteerStatus>::from_params(
            Some("Active"),
            Some(" ana "),
            Some("3"),
            10,
        )
        .unwrap();
        assert_eq!(spec.status, StatusFilter::Only(VolunteerStatus::Active));
        assert_eq!(spec.search.as_deref(), Some("ana"));
        assert_eq!(spec.page, 3);
        assert_eq!(spec.page_size, 10);
    }
}
