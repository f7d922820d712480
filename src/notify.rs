use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::AppError;

/// One due-date reminder, ready to hand to a delivery channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reminder {
    pub assignment_id: String,
    pub name: String,
    pub course_name: String,
    pub due_date: DateTime<Utc>,
    pub message: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, reminder: &Reminder) -> Result<(), AppError>;
}

/// Writes reminders to the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, reminder: &Reminder) -> Result<(), AppError> {
        info!(
            assignment_id = %reminder.assignment_id,
            due_date = %reminder.due_date,
            "Reminder: {}",
            reminder.message
        );
        Ok(())
    }
}

pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _reminder: &Reminder) -> Result<(), AppError> {
        Ok(())
    }
}
