//! Time range filters used by the admin views
//!
//! Both enums are parsed leniently from query parameters: an absent or
//! unknown value falls back to the widest range. All day boundaries are UTC.

use chrono::{DateTime, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Task analytics window, bounded from below only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaskTimeRange {
    #[serde(rename = "1week")]
    OneWeek,
    #[serde(rename = "2weeks")]
    TwoWeeks,
    #[serde(rename = "1month")]
    OneMonth,
    #[default]
    #[serde(rename = "all")]
    All,
}

impl TaskTimeRange {
    /// Parses a query value; anything unrecognized means `All`
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("1week") => TaskTimeRange::OneWeek,
            Some("2weeks") => TaskTimeRange::TwoWeeks,
            Some("1month") => TaskTimeRange::OneMonth,
            _ => TaskTimeRange::All,
        }
    }

    /// Earliest `created_at` included, `None` for no bound
    pub fn start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TaskTimeRange::OneWeek => Some(now - Duration::days(7)),
            TaskTimeRange::TwoWeeks => Some(now - Duration::days(14)),
            TaskTimeRange::OneMonth => Some(one_month_before(now)),
            TaskTimeRange::All => None,
        }
    }
}

/// Daily report window, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportTimeRange {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "yesterday")]
    Yesterday,
    #[serde(rename = "1week")]
    OneWeek,
    #[serde(rename = "1month")]
    OneMonth,
    #[default]
    #[serde(rename = "all")]
    AllTime,
}

impl ReportTimeRange {
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("today") => ReportTimeRange::Today,
            Some("yesterday") => ReportTimeRange::Yesterday,
            Some("1week") => ReportTimeRange::OneWeek,
            Some("1month") => ReportTimeRange::OneMonth,
            _ => ReportTimeRange::AllTime,
        }
    }

    /// `(start, end)` of the window relative to `now`
    pub fn bounds(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = now.date_naive();
        match self {
            ReportTimeRange::Today => day_bounds(today),
            ReportTimeRange::Yesterday => day_bounds(today - Duration::days(1)),
            ReportTimeRange::OneWeek => (now - Duration::days(7), now),
            ReportTimeRange::OneMonth => (one_month_before(now), now),
            ReportTimeRange::AllTime => (DateTime::<Utc>::from(std::time::UNIX_EPOCH), now),
        }
    }
}

/// First and last millisecond of a UTC day
pub fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));
    let end = start + Duration::days(1) - Duration::milliseconds(1);
    (start, end)
}

/// One calendar month earlier, clamped to the end of shorter months
fn one_month_before(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(1))
        .unwrap_or_else(|| now - Duration::days(30))
}
