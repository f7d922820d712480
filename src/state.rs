use sqlx::SqlitePool;

use crate::clock::Clock;
use crate::services::PlannerService;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub clock: Clock,
}

impl AppState {
    pub fn new(db: SqlitePool, clock: Clock) -> Self {
        Self { db, clock }
    }

    pub fn planner(&self) -> PlannerService {
        PlannerService::new(self.db.clone(), self.clock)
    }
}
