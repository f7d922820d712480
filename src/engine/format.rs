use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

const WELCOME_PHRASES: [&str; 3] = ["Welcome back,", "What's up,", "Do your work,"];

/// `M/DD`, e.g. `3/05`.
pub fn format_due_day<Tz: TimeZone>(due: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    due.with_timezone(tz).format("%-m/%d").to_string()
}

/// 12-hour clock with an uppercase suffix, e.g. `11:59PM`.
pub fn format_due_time<Tz: TimeZone>(due: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    due.with_timezone(tz).format("%-I:%M%p").to_string()
}

/// e.g. `Friday, March 15`.
pub fn format_day_header(day: NaiveDate) -> String {
    day.format("%A, %B %-d").to_string()
}

pub fn due_today_summary(count: usize) -> String {
    format!("You have {} assignments due today.", count)
}

/// Greeting for the home screen; stable for a given day.
pub fn welcome_message(day: NaiveDate) -> &'static str {
    WELCOME_PHRASES[day.ordinal0() as usize % WELCOME_PHRASES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn due_day_and_time_in_local_zone() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let due = Utc.with_ymd_and_hms(2024, 3, 6, 4, 59, 59).unwrap();

        assert_eq!(format_due_day(due, &tz), "3/05");
        assert_eq!(format_due_time(due, &tz), "11:59PM");
    }

    #[test]
    fn morning_and_noon_times() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let morning = Utc.with_ymd_and_hms(2024, 11, 20, 0, 5, 0).unwrap();
        let noon = Utc.with_ymd_and_hms(2024, 11, 20, 12, 0, 0).unwrap();

        assert_eq!(format_due_day(morning, &utc), "11/20");
        assert_eq!(format_due_time(morning, &utc), "12:05AM");
        assert_eq!(format_due_time(noon, &utc), "12:00PM");
    }

    #[test]
    fn header_and_summary() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(format_day_header(day), "Monday, March 4");
        assert_eq!(due_today_summary(0), "You have 0 assignments due today.");
        assert_eq!(due_today_summary(3), "You have 3 assignments due today.");
    }

    #[test]
    fn welcome_rotates_daily() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(welcome_message(day), "Welcome back,");
        assert_eq!(welcome_message(day.succ_opt().unwrap()), "What's up,");
    }
}
