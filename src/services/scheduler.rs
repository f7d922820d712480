use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::engine;
use crate::models::{Assignment, Course};
use crate::notify::{Notifier, Reminder};
use crate::presentation::{NO_COURSE_LABEL, index_courses};
use crate::services::planner::snapshot_or_empty;

/// Periodically sends one reminder per assignment as its due date
/// approaches.
pub struct ReminderScheduler {
    db: SqlitePool,
    notifier: Arc<dyn Notifier>,
    clock: Clock,
    interval: Duration,
    lead: chrono::Duration,
    reminded: HashSet<String>,
}

impl ReminderScheduler {
    pub fn new(
        db: SqlitePool,
        notifier: Arc<dyn Notifier>,
        clock: Clock,
        interval_secs: u64,
        lead_minutes: i64,
    ) -> Self {
        let lead = chrono::Duration::try_minutes(lead_minutes.max(0)).unwrap_or_else(|| {
            warn!("Reminder lead of {} min is out of range, using the maximum", lead_minutes);
            chrono::Duration::MAX
        });

        Self {
            db,
            notifier,
            clock,
            interval: Duration::from_secs(interval_secs),
            lead,
            reminded: HashSet::new(),
        }
    }

    /// Runs [`tick`](Self::tick) forever, sleeping `interval` between runs.
    pub async fn start(mut self) {
        info!(
            "Starting reminder scheduler (interval: {:?}, lead: {} min)",
            self.interval,
            self.lead.num_minutes()
        );

        loop {
            tokio::time::sleep(self.interval).await;

            let sent = self.tick().await;
            if sent > 0 {
                info!("Sent {} reminder(s)", sent);
            }
        }
    }

    /// Delivers reminders for assignments entering the lead window and
    /// returns how many were sent.
    pub async fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let zone = self.clock.zone();
        let assignments = snapshot_or_empty::<Assignment>(&self.db).await;
        let courses = index_courses(snapshot_or_empty::<Course>(&self.db).await);

        // Forget completed or deleted assignments.
        let live: HashSet<&str> = assignments.iter().map(|a| a.id.as_str()).collect();
        self.reminded.retain(|id| live.contains(id.as_str()));

        let ranked = engine::rank_by_urgency(&assignments, now);
        let mut sent = 0;
        for assignment in engine::due_within(&ranked, now, self.lead) {
            if self.reminded.contains(&assignment.id) {
                continue;
            }

            let course_name = courses
                .get(&assignment.course_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| NO_COURSE_LABEL.to_string());
            let reminder = Reminder {
                message: format!(
                    "{} ({}) is due at {}",
                    assignment.name,
                    course_name,
                    engine::format_due_time(assignment.due_date, &zone)
                ),
                assignment_id: assignment.id.clone(),
                name: assignment.name.clone(),
                course_name,
                due_date: assignment.due_date,
            };

            match self.notifier.notify(&reminder).await {
                Ok(()) => {
                    self.reminded.insert(assignment.id);
                    sent += 1;
                }
                Err(e) => {
                    // Not marked; the next tick retries.
                    warn!("Reminder for {} failed: {:?}", reminder.assignment_id, e);
                }
            }
        }

        sent
    }
}
