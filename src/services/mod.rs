pub mod planner;
pub mod scheduler;

pub use planner::{Completion, PlannerService};
pub use scheduler::ReminderScheduler;
