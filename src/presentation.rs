use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::engine::{self, Urgency};
use crate::models::{Assignment, Course, DEFAULT_COLOR_TAG, Profile};

/// Label used when an assignment's course no longer exists.
pub const NO_COURSE_LABEL: &str = "No Course Selected";

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub due_day: String,
    pub due_time: String,
    pub urgency: Urgency,
    pub course_id: String,
    pub course_name: String,
    pub course_color: String,
}

impl AssignmentRow {
    pub fn build<Tz>(
        assignment: &Assignment,
        courses: &HashMap<String, Course>,
        now: DateTime<Utc>,
        zone: &Tz,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let (course_name, course_color) = match courses.get(&assignment.course_id) {
            Some(course) => (course.name.clone(), course.color_tag.clone()),
            None => (NO_COURSE_LABEL.to_string(), DEFAULT_COLOR_TAG.to_string()),
        };

        Self {
            id: assignment.id.clone(),
            name: assignment.name.clone(),
            description: assignment.description.clone(),
            due_date: assignment.due_date,
            due_day: engine::format_due_day(assignment.due_date, zone),
            due_time: engine::format_due_time(assignment.due_date, zone),
            urgency: engine::classify(assignment.due_date, now, zone),
            course_id: assignment.course_id.clone(),
            course_name,
            course_color,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseRow {
    pub id: String,
    pub name: String,
    pub instructor: Option<String>,
    pub color_tag: String,
    pub initial: String,
    pub assignment_count: usize,
}

impl CourseRow {
    pub fn build(course: &Course, assignments: &[Assignment]) -> Self {
        let assignment_count = assignments
            .iter()
            .filter(|a| a.course_id == course.id)
            .count();

        Self {
            id: course.id.clone(),
            name: course.name.clone(),
            instructor: course.instructor.clone(),
            color_tag: course.color_tag.clone(),
            initial: course.name.chars().take(1).collect(),
            assignment_count,
        }
    }
}

/// Every assignment, most urgent first.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentBoard {
    pub semester: String,
    pub assignments: Vec<AssignmentRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub header: String,
    pub welcome: String,
    pub profile_name: String,
    pub summary: String,
    pub due_today_count: usize,
    pub assignments: Vec<AssignmentRow>,
}

impl HomeView {
    pub fn build(today: NaiveDate, profile: &Profile, due_today: Vec<AssignmentRow>) -> Self {
        Self {
            header: engine::format_day_header(today),
            welcome: engine::welcome_message(today).to_string(),
            profile_name: profile.name.clone(),
            summary: engine::due_today_summary(due_today.len()),
            due_today_count: due_today.len(),
            assignments: due_today,
        }
    }
}

pub fn index_courses(courses: Vec<Course>) -> HashMap<String, Course> {
    courses.into_iter().map(|c| (c.id.clone(), c)).collect()
}
