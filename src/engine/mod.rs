//! Ranking and classification of assignments.
//!
//! Everything here is a pure function over a snapshot: no store access, no
//! wall clock. Callers pass "now" and the local zone explicitly.

pub mod format;
pub mod ranking;
pub mod semester;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

pub use format::{
    due_today_summary, format_day_header, format_due_day, format_due_time, welcome_message,
};
pub use ranking::{Due, Urgency, classify, due_within, filter_due_today, rank_by_urgency};
pub use semester::{Season, classify_semester};

/// Last second (23:59:59) of `day` in `tz`, as a UTC instant.
pub fn end_of_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let local = day
        .and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| day.and_time(NaiveTime::default()));
    match tz.from_local_datetime(&local).latest() {
        Some(instant) => instant.with_timezone(&Utc),
        // Nonexistent local time; fall back to reading it as UTC.
        None => local.and_utc(),
    }
}
