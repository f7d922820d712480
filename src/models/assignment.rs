use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::engine::{Due, end_of_day};
use crate::error::AppError;

/// Message shown by the creation form when a required field is empty.
pub const MISSING_FIELDS: &str = "Missing fields. Try again.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub id: String,
    pub course_id: String,
    pub name: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Due for Assignment {
    fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }
}

/// Body for creating an assignment or replacing all of its fields.
///
/// `due_date` takes an RFC 3339 instant or a bare `YYYY-MM-DD` day. A bare
/// day, or no value at all, means 23:59:59 local time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentRequest {
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub due_date: Option<String>,
}

/// Validated form of [`AssignmentRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentFields {
    pub course_id: String,
    pub name: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
}

impl AssignmentRequest {
    pub fn validate<Tz: TimeZone>(
        self,
        today: NaiveDate,
        zone: &Tz,
    ) -> Result<AssignmentFields, AppError> {
        let course_id = self.course_id.trim();
        let name = self.name.trim();
        let description = self.description.trim();

        if course_id.is_empty() || name.is_empty() || description.is_empty() {
            return Err(AppError::BadRequest(MISSING_FIELDS.to_string()));
        }

        let due_date = match self.due_date.as_deref() {
            Some(raw) => resolve_due_date(raw, zone)?,
            None => end_of_day(today, zone),
        };

        Ok(AssignmentFields {
            course_id: course_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            due_date,
        })
    }
}

pub fn resolve_due_date<Tz: TimeZone>(raw: &str, zone: &Tz) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|day| end_of_day(day, zone))
        .map_err(|_| AppError::BadRequest(format!("Invalid due date: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn est() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    #[test]
    fn bare_day_resolves_to_last_second_local() {
        let due = resolve_due_date("2024-03-15", &est()).unwrap();
        assert_eq!(due, Utc.with_ymd_and_hms(2024, 3, 16, 4, 59, 59).unwrap());
    }

    #[test]
    fn rfc3339_instant_is_kept() {
        let due = resolve_due_date("2024-03-15T10:30:00-05:00", &est()).unwrap();
        assert_eq!(due, Utc.with_ymd_and_hms(2024, 3, 15, 15, 30, 0).unwrap());
    }

    #[test]
    fn garbage_due_date_is_rejected() {
        assert!(matches!(
            resolve_due_date("next friday", &est()),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn missing_due_date_defaults_to_tonight() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let fields = AssignmentRequest {
            course_id: "c1".to_string(),
            name: "Lab report".to_string(),
            description: "Sections 1-3".to_string(),
            due_date: None,
        }
        .validate(today, &est())
        .unwrap();

        assert_eq!(fields.due_date, end_of_day(today, &est()));
    }

    #[test]
    fn empty_fields_are_rejected() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let req = AssignmentRequest {
            course_id: "c1".to_string(),
            name: "Lab report".to_string(),
            description: "  ".to_string(),
            due_date: None,
        };

        match req.validate(today, &est()) {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, MISSING_FIELDS),
            other => panic!("expected missing fields, got {:?}", other),
        }
    }
}
