use axum::Json;
use axum::body::Bytes;
use axum::extract::Path;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{post, put};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::db::repository;
use crate::engine;
use crate::error::AppError;
use crate::models::*;
use crate::models::course::normalize_color_tag;
use crate::presentation::{AssignmentBoard, AssignmentRow, CourseRow, HomeView};
use crate::services::Completion;
use crate::state::AppState;

#[derive(Serialize)]
struct SemesterResponse {
    label: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/home", get(home))
        .route("/semester", get(semester))
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/{id}",
            get(get_course).patch(update_course).delete(delete_course),
        )
        .route("/courses/{id}/color", put(set_course_color))
        .route("/assignments", get(list_assignments).post(create_assignment))
        .route(
            "/assignments/{id}",
            get(get_assignment)
                .put(replace_assignment)
                .delete(delete_assignment),
        )
        .route("/assignments/{id}/complete", post(complete_assignment))
        .route("/profile", get(get_profile).put(update_profile))
        .route(
            "/profile/picture",
            get(get_profile_picture).put(set_profile_picture),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn home(State(state): State<AppState>) -> Json<HomeView> {
    Json(state.planner().home().await)
}

async fn semester(State(state): State<AppState>) -> Json<SemesterResponse> {
    Json(SemesterResponse {
        label: engine::classify_semester(state.clock.today()),
    })
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<CourseRow>>, AppError> {
    let courses = repository::fetch_all::<Course>(&state.db).await?;
    let assignments = repository::fetch_all::<Assignment>(&state.db).await?;
    let rows = courses
        .iter()
        .map(|c| CourseRow::build(c, &assignments))
        .collect();
    Ok(Json(rows))
}

async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<NewCourseRequest>
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = repository::insert_course(&state.db, req.validate()?).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<CourseRow>, AppError> {
    let course = repository::find_by_id::<Course>(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    let assignments = repository::fetch_all::<Assignment>(&state.db).await?;
    Ok(Json(CourseRow::build(&course, &assignments)))
}

async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCourseRequest>
) -> Result<Json<Course>, AppError> {
    let course = repository::update_course(&state.db, &id, req.validate()?)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(course))
}

async fn set_course_color(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetColorRequest>
) -> Result<Json<Course>, AppError> {
    let color_tag = normalize_color_tag(&req.color_tag)?;
    let course = repository::set_course_color(&state.db, &id, &color_tag)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(course))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<StatusCode, AppError> {
    let ok = repository::delete_course(&state.db, &id).await?;
    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

async fn list_assignments(State(state): State<AppState>) -> Json<AssignmentBoard> {
    Json(state.planner().board().await)
}

async fn create_assignment(
    State(state): State<AppState>,
    Json(req): Json<AssignmentRequest>
) -> Result<(StatusCode, Json<AssignmentRow>), AppError> {
    let row = state.planner().create_assignment(req).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<AssignmentRow>, AppError> {
    Ok(Json(state.planner().assignment(&id).await?))
}

async fn replace_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AssignmentRequest>
) -> Result<Json<AssignmentRow>, AppError> {
    Ok(Json(state.planner().replace_assignment(&id, req).await?))
}

async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<StatusCode, AppError> {
    state.planner().delete_assignment(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn complete_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<Completion>, AppError> {
    Ok(Json(state.planner().complete_assignment(&id).await?))
}

async fn get_profile(State(state): State<AppState>) -> Result<Json<Profile>, AppError> {
    let row = repository::fetch_profile(&state.db).await?;
    Ok(Json(Profile::from(row)))
}

async fn update_profile(
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>
) -> Result<Json<Profile>, AppError> {
    let name = req.validate()?;
    repository::set_profile_name(&state.db, &name).await?;
    let row = repository::fetch_profile(&state.db).await?;
    Ok(Json(Profile::from(row)))
}

async fn get_profile_picture(State(state): State<AppState>) -> Result<Response, AppError> {
    let picture = repository::fetch_profile(&state.db)
        .await?
        .picture
        .ok_or(AppError::NotFound)?;
    let content_type = PictureFormat::detect(&picture)
        .map(PictureFormat::content_type)
        .unwrap_or("application/octet-stream");

    Ok(([(header::CONTENT_TYPE, content_type)], picture).into_response())
}

async fn set_profile_picture(
    State(state): State<AppState>,
    body: Bytes
) -> Result<StatusCode, AppError> {
    if PictureFormat::detect(&body).is_none() {
        return Err(AppError::BadRequest(
            "Profile picture must be a PNG or JPEG image".to_string(),
        ));
    }
    repository::set_profile_picture(&state.db, &body).await?;
    Ok(StatusCode::NO_CONTENT)
}
