use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

/// Neutral gray used when a course has no color of its own.
pub const DEFAULT_COLOR_TAG: &str = "#858585";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub instructor: Option<String>,
    pub color_tag: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    #[serde(default)]
    pub name: String,
    pub instructor: Option<String>,
    pub color_tag: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub instructor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetColorRequest {
    pub color_tag: String,
}

impl NewCourseRequest {
    /// Trims the free-text fields and resolves the color tag.
    pub fn validate(self) -> Result<NewCourseRequest, AppError> {
        let name = course_name(&self.name)?;
        let color_tag = match self.color_tag.as_deref() {
            Some(tag) => normalize_color_tag(tag)?,
            None => DEFAULT_COLOR_TAG.to_string(),
        };

        Ok(NewCourseRequest {
            name,
            instructor: blank_to_none(self.instructor),
            color_tag: Some(color_tag),
        })
    }
}

impl UpdateCourseRequest {
    pub fn validate(self) -> Result<UpdateCourseRequest, AppError> {
        let name = match self.name {
            Some(name) => Some(course_name(&name)?),
            None => None,
        };

        Ok(UpdateCourseRequest {
            name,
            instructor: self.instructor.map(|i| i.trim().to_string()),
        })
    }
}

fn course_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Course name is required".to_string()));
    }
    Ok(name.to_string())
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts `#RRGGBB` (the leading `#` is optional) and returns it uppercased.
pub fn normalize_color_tag(raw: &str) -> Result<String, AppError> {
    let hex = raw.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);

    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::BadRequest(format!("Invalid color tag: {}", raw)));
    }

    Ok(format!("#{}", hex.to_ascii_uppercase()))
}
