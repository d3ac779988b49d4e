//! Click analytics entities.

use chrono::{DateTime, NaiveDate, Utc};

/// Format of the per-day aggregate key.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Formats the UTC calendar day of `at` as `YYYY-MM-DD`.
pub fn utc_day(at: DateTime<Utc>) -> String {
    at.format(DAY_FORMAT).to_string()
}

/// Formats a calendar date as `YYYY-MM-DD`.
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

/// Click count for one link on one UTC day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyClicks {
    pub day: String,
    pub clicks: i64,
}

/// Result of a click recording attempt.
///
/// Recording never fails towards the caller; any reason for not counting
/// the click collapses into [`ClickOutcome::NotRecorded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Recorded,
    NotRecorded,
}

impl ClickOutcome {
    pub fn is_recorded(self) -> bool {
        self == ClickOutcome::Recorded
    }
}
