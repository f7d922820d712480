pub mod assignment;
pub mod course;
pub mod profile;

pub use assignment::{Assignment, AssignmentFields, AssignmentRequest, resolve_due_date};
pub use course::{Course, DEFAULT_COLOR_TAG, NewCourseRequest, SetColorRequest, UpdateCourseRequest};
pub use profile::{DEFAULT_PROFILE_NAME, PictureFormat, Profile, ProfileRow, UpdateProfileRequest};
