use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{FixedOffset, TimeZone, Utc};
use planner::clock::Clock;
use planner::db::{memory_pool, repository};
use planner::error::AppError;
use planner::models::{AssignmentFields, Assignment, NewCourseRequest};
use planner::notify::{NoopNotifier, Notifier, Reminder};
use planner::services::ReminderScheduler;
use sqlx::SqlitePool;

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Reminder>>,
    fail: Mutex<bool>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, reminder: &Reminder) -> Result<(), AppError> {
        if *self.fail.lock().unwrap() {
            return Err(AppError::BadRequest("channel down".to_string()));
        }
        self.sent.lock().unwrap().push(reminder.clone());
        Ok(())
    }
}

fn clock() -> Clock {
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
    Clock::frozen(now, FixedOffset::east_opt(0).unwrap())
}

async fn seed(pool: &SqlitePool) -> Vec<Assignment> {
    let course = repository::insert_course(
        pool,
        NewCourseRequest {
            name: "Statistics".to_string(),
            instructor: None,
            color_tag: None,
        },
    )
    .await
    .expect("Failed to insert course");

    let mut out = Vec::new();
    for (name, minute) in [("Quiz", 45), ("Project", 30), ("Final", 600)] {
        let assignment = repository::insert_assignment(
            pool,
            AssignmentFields {
                course_id: course.id.clone(),
                name: name.to_string(),
                description: "Chapter review".to_string(),
                due_date: Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
                    + chrono::Duration::minutes(minute),
            },
        )
        .await
        .expect("Failed to insert assignment");
        out.push(assignment);
    }
    out
}

#[tokio::test]
async fn test_scheduler_initialization() {
    let pool = memory_pool().await.expect("Failed to create database");

    let notifier = Arc::new(NoopNotifier);

    // 10 second interval; constructed only, not started.
    let _scheduler = ReminderScheduler::new(pool, notifier, clock(), 10, 60);
}

#[tokio::test]
async fn test_tick_reminds_once_in_urgency_order() {
    let pool = memory_pool().await.expect("Failed to create database");
    seed(&pool).await;

    let notifier = Arc::new(RecordingNotifier::default());
    let mut scheduler = ReminderScheduler::new(pool, notifier.clone(), clock(), 60, 60);

    assert_eq!(scheduler.tick().await, 2);
    assert_eq!(scheduler.tick().await, 0);

    let sent = notifier.sent.lock().unwrap();
    let names: Vec<&str> = sent.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Project", "Quiz"]);
    assert_eq!(sent[0].course_name, "Statistics");
    assert_eq!(sent[0].message, "Project (Statistics) is due at 12:30PM");
}

#[tokio::test]
async fn test_failed_delivery_is_retried() {
    let pool = memory_pool().await.expect("Failed to create database");
    seed(&pool).await;

    let notifier = Arc::new(RecordingNotifier::default());
    *notifier.fail.lock().unwrap() = true;
    let mut scheduler = ReminderScheduler::new(pool, notifier.clone(), clock(), 60, 60);

    assert_eq!(scheduler.tick().await, 0);

    *notifier.fail.lock().unwrap() = false;
    assert_eq!(scheduler.tick().await, 2);
}

#[tokio::test]
async fn test_scheduler_short_interval() {
    let pool = memory_pool().await.expect("Failed to create database");
    seed(&pool).await;

    let notifier = Arc::new(RecordingNotifier::default());

    // 1 second interval, run for a little over one tick.
    let scheduler = ReminderScheduler::new(pool, notifier.clone(), clock(), 1, 60);
    let scheduler_task = tokio::spawn(async move {
        scheduler.start().await;
    });

    tokio::time::sleep(Duration::from_millis(1500)).await;
    scheduler_task.abort();

    assert_eq!(notifier.sent.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_oversized_lead_does_not_panic() {
    let pool = memory_pool().await.expect("Failed to create database");
    seed(&pool).await;

    let notifier = Arc::new(RecordingNotifier::default());
    let mut scheduler = ReminderScheduler::new(pool, notifier.clone(), clock(), 60, i64::MAX);

    assert_eq!(scheduler.tick().await, 3);

    let sent = notifier.sent.lock().unwrap();
    let names: Vec<&str> = sent.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Project", "Quiz", "Final"]);
}

#[tokio::test]
async fn test_tick_with_unavailable_store_sends_nothing() {
    let pool = memory_pool().await.expect("Failed to create database");
    seed(&pool).await;

    let notifier = Arc::new(RecordingNotifier::default());
    let mut scheduler = ReminderScheduler::new(pool.clone(), notifier.clone(), clock(), 60, 60);
    pool.close().await;

    assert_eq!(scheduler.tick().await, 0);
    assert!(notifier.sent.lock().unwrap().is_empty());
}
