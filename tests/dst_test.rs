use chrono::{NaiveDate, TimeZone, Utc};
use planner::clock::{Clock, Zone};
use planner::engine::{classify_semester, filter_due_today, format_due_day, format_due_time};
use planner::models::{AssignmentRequest, resolve_due_date};

// US Eastern rules as a POSIX TZ string, so no zoneinfo files are needed.
const EASTERN: &str = "EST5EDT,M3.2.0,M11.1.0";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// Single test in this binary: it owns the process time zone.
#[test]
fn host_zone_resolves_each_date_with_its_own_offset() {
    // SAFETY: no other test runs in this binary, and nothing has read the
    // environment yet.
    unsafe { std::env::set_var("TZ", EASTERN) };

    // Monday, October 19 2026, 10:00 EDT.
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 14, 0, 0).unwrap();
    let clock = Clock::frozen(now, Zone::Host);
    let zone = clock.zone();

    assert_eq!(clock.today(), date(2026, 10, 19));
    assert_eq!(classify_semester(clock.today()), "Fall 2026");

    // Still EDT: 23:59:59 -04:00.
    let tonight = resolve_due_date("2026-10-19", &zone).unwrap();
    assert_eq!(tonight, Utc.with_ymd_and_hms(2026, 10, 20, 3, 59, 59).unwrap());

    // After fall-back: 23:59:59 -05:00, and it still reads as 11:59PM.
    let december = resolve_due_date("2026-12-01", &zone).unwrap();
    assert_eq!(december, Utc.with_ymd_and_hms(2026, 12, 2, 4, 59, 59).unwrap());
    assert_eq!(format_due_day(december, &zone), "12/01");
    assert_eq!(format_due_time(december, &zone), "11:59PM");

    // A date entered in winter for a day after spring-forward.
    let winter = Clock::frozen(Utc.with_ymd_and_hms(2027, 1, 10, 17, 0, 0).unwrap(), Zone::Host);
    let april = resolve_due_date("2027-04-01", &winter.zone()).unwrap();
    assert_eq!(april, Utc.with_ymd_and_hms(2027, 4, 2, 3, 59, 59).unwrap());

    let on_the_day = filter_due_today(&[april], date(2027, 4, 1), &zone);
    assert_eq!(on_the_day, vec![april]);
    assert!(filter_due_today(&[april], date(2027, 4, 2), &zone).is_empty());

    // Omitted due date: end of the clock's local day.
    let fields = AssignmentRequest {
        course_id: "c1".to_string(),
        name: "Reading response".to_string(),
        description: "Chapter 4".to_string(),
        due_date: None,
    }
    .validate(winter.today(), &winter.zone())
    .unwrap();
    assert_eq!(fields.due_date, Utc.with_ymd_and_hms(2027, 1, 11, 4, 59, 59).unwrap());
}
