use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::db::repository::{self, Record};
use crate::engine;
use crate::error::AppError;
use crate::models::{Assignment, AssignmentRequest, Course, Profile};
use crate::presentation::{AssignmentBoard, AssignmentRow, HomeView, index_courses};

pub const COURSE_REQUIRED: &str = "You must add a course before adding an assignment.";

/// Result of completing an assignment. `celebrate` tells the client to play
/// its completion animation.
#[derive(Debug, Clone, Serialize)]
pub struct Completion {
    pub id: String,
    pub celebrate: bool,
}

/// Joins the record store with the ranking engine for the screens that need
/// both.
pub struct PlannerService {
    db: SqlitePool,
    clock: Clock,
}

impl PlannerService {
    pub fn new(db: SqlitePool, clock: Clock) -> Self {
        Self { db, clock }
    }

    /// All assignments, most urgent first, labelled with the current semester.
    pub async fn board(&self) -> AssignmentBoard {
        let now = self.clock.now();
        let zone = self.clock.zone();
        let courses = index_courses(snapshot_or_empty::<Course>(&self.db).await);
        let assignments = snapshot_or_empty::<Assignment>(&self.db).await;

        let rows = engine::rank_by_urgency(&assignments, now)
            .iter()
            .map(|a| AssignmentRow::build(a, &courses, now, &zone))
            .collect();

        AssignmentBoard {
            semester: engine::classify_semester(self.clock.today()),
            assignments: rows,
        }
    }

    pub async fn home(&self) -> HomeView {
        let now = self.clock.now();
        let zone = self.clock.zone();
        let today = self.clock.today();

        let profile = match repository::fetch_profile(&self.db).await {
            Ok(row) => Profile::from(row),
            Err(e) => {
                warn!("Failed to fetch profile, using defaults: {}", e);
                Profile::default()
            }
        };
        let courses = index_courses(snapshot_or_empty::<Course>(&self.db).await);
        let assignments = snapshot_or_empty::<Assignment>(&self.db).await;

        let ranked = engine::rank_by_urgency(&assignments, now);
        let due_today = engine::filter_due_today(&ranked, today, &zone)
            .iter()
            .map(|a| AssignmentRow::build(a, &courses, now, &zone))
            .collect();

        HomeView::build(today, &profile, due_today)
    }

    pub async fn assignment(&self, id: &str) -> Result<AssignmentRow, AppError> {
        let assignment = repository::find_by_id::<Assignment>(&self.db, id)
            .await?
            .ok_or(AppError::NotFound)?;
        self.row(&assignment).await
    }

    pub async fn create_assignment(
        &self,
        req: AssignmentRequest,
    ) -> Result<AssignmentRow, AppError> {
        if repository::count::<Course>(&self.db).await? == 0 {
            return Err(AppError::Conflict(COURSE_REQUIRED.to_string()));
        }

        let fields = req.validate(self.clock.today(), &self.clock.zone())?;
        self.ensure_course(&fields.course_id).await?;

        let assignment = repository::insert_assignment(&self.db, fields).await?;
        info!("Created assignment {} ({})", assignment.id, assignment.name);
        self.row(&assignment).await
    }

    pub async fn replace_assignment(
        &self,
        id: &str,
        req: AssignmentRequest,
    ) -> Result<AssignmentRow, AppError> {
        let fields = req.validate(self.clock.today(), &self.clock.zone())?;
        self.ensure_course(&fields.course_id).await?;

        let assignment = repository::replace_assignment(&self.db, id, fields)
            .await?
            .ok_or(AppError::NotFound)?;
        self.row(&assignment).await
    }

    pub async fn delete_assignment(&self, id: &str) -> Result<(), AppError> {
        if !repository::delete_by_id::<Assignment>(&self.db, id).await? {
            return Err(AppError::NotFound);
        }
        info!("Deleted assignment {}", id);
        Ok(())
    }

    /// Completing an assignment removes it from the store.
    pub async fn complete_assignment(&self, id: &str) -> Result<Completion, AppError> {
        if !repository::delete_by_id::<Assignment>(&self.db, id).await? {
            return Err(AppError::NotFound);
        }
        info!("Completed assignment {}", id);
        Ok(Completion {
            id: id.to_string(),
            celebrate: true,
        })
    }

    async fn ensure_course(&self, course_id: &str) -> Result<(), AppError> {
        match repository::find_by_id::<Course>(&self.db, course_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::BadRequest(format!("Unknown course: {}", course_id))),
        }
    }

    async fn row(&self, assignment: &Assignment) -> Result<AssignmentRow, AppError> {
        let courses = index_courses(repository::fetch_all::<Course>(&self.db).await?);
        Ok(AssignmentRow::build(
            assignment,
            &courses,
            self.clock.now(),
            &self.clock.zone(),
        ))
    }
}

/// Fetches every `R`, or nothing if the store is unavailable this cycle.
pub async fn snapshot_or_empty<R: Record>(db: &SqlitePool) -> Vec<R> {
    match repository::fetch_all::<R>(db).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Failed to fetch {}, continuing with none: {}", R::TABLE, e);
            Vec::new()
        }
    }
}
