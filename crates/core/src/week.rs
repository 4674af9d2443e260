//! Monday-to-Sunday week arithmetic.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone};
use serde::Serialize;

/// Monday of the week containing `date`. Sunday belongs to the week that
/// started six days earlier.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    let day_of_week = date.weekday().num_days_from_sunday() as i64;
    let offset = if day_of_week == 0 { -6 } else { 1 - day_of_week };
    date + Duration::days(offset)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Day-of-year based index local to the Monday's year. This is not ISO-8601
    /// week numbering: a Monday in late December can yield 53.
    pub week_number: u32,
}

pub fn week_range_of(date: NaiveDate) -> WeekRange {
    let start = monday_of(date);
    WeekRange {
        start,
        end: start + Duration::days(6),
        week_number: start.ordinal().div_ceil(7),
    }
}

impl WeekRange {
    /// The seven dates of the week in ascending order. Each call starts over.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + Clone {
        self.start.iter_days().take(7)
    }

    pub fn start_key(&self) -> String {
        canonical_date_key(self.start)
    }

    pub fn end_key(&self) -> String {
        canonical_date_key(self.end)
    }

    pub fn next(&self) -> WeekRange {
        week_range_of(self.start + Duration::days(7))
    }

    pub fn previous(&self) -> WeekRange {
        week_range_of(self.start - Duration::days(7))
    }
}

/// `YYYY-MM-DD` of a calendar date.
pub fn canonical_date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `YYYY-MM-DD` of an instant as seen on the wall calendar of its own zone.
///
/// Converting to UTC first would move the key by a day near midnight.
pub fn local_date_key<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    canonical_date_key(instant.date_naive())
}

pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// The part of a stored date before any time separator.
pub fn date_key(raw: &str) -> &str {
    let raw = raw.trim();
    raw.split(['T', ' ']).next().unwrap_or(raw)
}

/// Parses a `YYYY-MM-DD` value, tolerating a time suffix.
pub fn parse_date_key(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_key(raw), "%Y-%m-%d").ok()
}
