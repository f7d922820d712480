use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Shown when a date matches no season window.
pub const FALLBACK_SEMESTER: &str = "Current Semester";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

// Inclusive (month, day) windows, checked in order. The boundary days
// May 1 and August 10 belong to the earlier season.
const WINDOWS: [(Season, (u32, u32), (u32, u32)); 3] = [
    (Season::Spring, (1, 1), (5, 1)),
    (Season::Summer, (5, 1), (8, 10)),
    (Season::Fall, (8, 10), (12, 31)),
];

pub fn season_of(day: NaiveDate) -> Option<Season> {
    let key = (day.month(), day.day());
    WINDOWS
        .iter()
        .find(|(_, start, end)| *start <= key && key <= *end)
        .map(|(season, _, _)| *season)
}

/// Label for the academic term `day` falls in, e.g. `"Spring 2024"`.
pub fn classify_semester(day: NaiveDate) -> String {
    match season_of(day) {
        Some(season) => format!("{} {}", season.as_str(), day.year()),
        None => FALLBACK_SEMESTER.to_string(),
    }
}
