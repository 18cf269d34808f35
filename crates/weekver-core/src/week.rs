//! Calendar week buckets
//!
//! Weeks are counted from January 1 rather than ISO-8601: the elapsed time
//! since Jan 1 00:00 UTC is rounded up to whole days, then to whole weeks.
//! A partial first day counts as day one, so every instant of the year
//! lands in week 1..=53.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// A (year, week) bucket. Two timestamps are in the same week iff their keys
/// are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekKey {
    /// Full calendar year, e.g. 2024.
    pub year: i32,
    /// Week of the year, 1-based.
    pub week: u32,
}

impl WeekKey {
    /// Bucket a timestamp.
    pub fn of(at: DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            week: week_number(at),
        }
    }

    /// Last two digits of the year.
    pub fn short_year(&self) -> u32 {
        self.year.rem_euclid(100) as u32
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-w{}", self.year, self.week)
    }
}

/// Week of the year for `at`, in `1..=53`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use weekver_core::week::week_number;
///
/// let wednesday = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
/// assert_eq!(week_number(wednesday), 2);
/// ```
pub fn week_number(at: DateTime<Utc>) -> u32 {
    let elapsed = (at - start_of_year(at.year())).num_seconds();
    let days = elapsed.div_euclid(SECONDS_PER_DAY)
        + i64::from(elapsed.rem_euclid(SECONDS_PER_DAY) != 0);
    let weeks = (days + 6) / 7;
    weeks.max(1) as u32
}

fn start_of_year(year: i32) -> DateTime<Utc> {
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    Utc.from_utc_datetime(&jan1)
}
