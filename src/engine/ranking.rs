use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A record with a due instant.
pub trait Due {
    fn due_date(&self) -> DateTime<Utc>;
}

impl Due for DateTime<Utc> {
    fn due_date(&self) -> DateTime<Utc> {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Overdue,
    DueToday,
    Upcoming,
}

/// Orders records ascending by `due - now`.
///
/// Past-due records come first, least overdue leading. Equal due dates keep
/// their input order. The input is left untouched.
pub fn rank_by_urgency<T: Due + Clone>(items: &[T], now: DateTime<Utc>) -> Vec<T> {
    let mut ranked = items.to_vec();
    ranked.sort_by_key(|item| item.due_date() - now);
    ranked
}

/// Records whose due date falls on `today` in `tz`, by calendar day rather
/// than a rolling 24 hours. Input order is preserved.
pub fn filter_due_today<T, Tz>(items: &[T], today: NaiveDate, tz: &Tz) -> Vec<T>
where
    T: Due + Clone,
    Tz: TimeZone,
{
    items
        .iter()
        .filter(|item| item.due_date().with_timezone(tz).date_naive() == today)
        .cloned()
        .collect()
}

pub fn classify<Tz: TimeZone>(due: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> Urgency {
    if due < now {
        Urgency::Overdue
    } else if due.with_timezone(tz).date_naive() == now.with_timezone(tz).date_naive() {
        Urgency::DueToday
    } else {
        Urgency::Upcoming
    }
}

/// Records due in the window `(now, now + lead]`, in input order.
pub fn due_within<T: Due + Clone>(items: &[T], now: DateTime<Utc>, lead: Duration) -> Vec<T> {
    // Past the representable range every future date is inside the window.
    let horizon = now.checked_add_signed(lead);
    items
        .iter()
        .filter(|item| {
            let due = item.due_date();
            due > now && horizon.is_none_or(|h| due <= h)
        })
        .cloned()
        .collect()
}
