use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::models::{
    Assignment, AssignmentFields, Course, DEFAULT_COLOR_TAG, NewCourseRequest, ProfileRow,
    UpdateCourseRequest,
};

/// A table whose rows decode into `Self`.
pub trait Record: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    const TABLE: &'static str;
    const COLUMNS: &'static str;
    const ORDER_BY: &'static str;
}

impl Record for Course {
    const TABLE: &'static str = "courses";
    const COLUMNS: &'static str = "id, name, instructor, color_tag, created_at, updated_at";
    const ORDER_BY: &'static str = "created_at ASC";
}

impl Record for Assignment {
    const TABLE: &'static str = "assignments";
    const COLUMNS: &'static str =
        "id, course_id, name, description, due_date, created_at, updated_at";
    const ORDER_BY: &'static str = "created_at ASC";
}

pub async fn fetch_all<R: Record>(db: &SqlitePool) -> Result<Vec<R>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        R::COLUMNS,
        R::TABLE,
        R::ORDER_BY
    );
    sqlx::query_as::<_, R>(&sql).fetch_all(db).await
}

pub async fn find_by_id<R: Record>(db: &SqlitePool, id: &str) -> Result<Option<R>, sqlx::Error> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?", R::COLUMNS, R::TABLE);
    sqlx::query_as::<_, R>(&sql).bind(id).fetch_optional(db).await
}

pub async fn delete_by_id<R: Record>(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let sql = format!("DELETE FROM {} WHERE id = ?", R::TABLE);
    let result = sqlx::query(&sql)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn count<R: Record>(db: &SqlitePool) -> Result<i64, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE);
    sqlx::query_scalar::<_, i64>(&sql).fetch_one(db).await
}

/// Expects a request that already went through `NewCourseRequest::validate`.
pub async fn insert_course(
    db: &SqlitePool,
    req: NewCourseRequest,
) -> Result<Course, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    let color_tag = req
        .color_tag
        .unwrap_or_else(|| DEFAULT_COLOR_TAG.to_string());

    sqlx::query(
        r#"
        INSERT INTO courses
            (id, name, instructor, color_tag, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        "#,
    )
    .bind(&id)
    .bind(&req.name)
    .bind(&req.instructor)
    .bind(&color_tag)
    .bind(now)
    .execute(db)
    .await?;

    Ok(Course {
        id,
        name: req.name,
        instructor: req.instructor,
        color_tag,
        created_at: now,
        updated_at: now,
    })
}

pub async fn update_course(
    db: &SqlitePool,
    id: &str,
    req: UpdateCourseRequest,
) -> Result<Option<Course>, sqlx::Error> {
    let mut current = match find_by_id::<Course>(db, id).await? {
        Some(c) => c,
        None => return Ok(None),
    };

    if let Some(name) = req.name {
        current.name = name;
    }
    if let Some(instructor) = req.instructor {
        current.instructor = Some(instructor).filter(|i| !i.is_empty());
    }
    current.updated_at = Utc::now();

    sqlx::query(
        r#"
        UPDATE courses
        SET name = ?1,
            instructor = ?2,
            updated_at = ?3
        WHERE id = ?4
        "#,
    )
    .bind(&current.name)
    .bind(&current.instructor)
    .bind(current.updated_at)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn set_course_color(
    db: &SqlitePool,
    id: &str,
    color_tag: &str,
) -> Result<Option<Course>, sqlx::Error> {
    let now = Utc::now();
    let affected = sqlx::query("UPDATE courses SET color_tag = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(color_tag)
        .bind(now)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    if affected == 0 {
        return Ok(None);
    }
    find_by_id::<Course>(db, id).await
}

/// Removes the course and every assignment that references it.
pub async fn delete_course(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM assignments WHERE course_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(result > 0)
}

pub async fn insert_assignment(
    db: &SqlitePool,
    fields: AssignmentFields,
) -> Result<Assignment, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO assignments
            (id, course_id, name, description, due_date, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
        "#,
    )
    .bind(&id)
    .bind(&fields.course_id)
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.due_date)
    .bind(now)
    .execute(db)
    .await?;

    Ok(Assignment {
        id,
        course_id: fields.course_id,
        name: fields.name,
        description: fields.description,
        due_date: fields.due_date,
        created_at: now,
        updated_at: now,
    })
}

/// Overwrites every editable field of an assignment.
pub async fn replace_assignment(
    db: &SqlitePool,
    id: &str,
    fields: AssignmentFields,
) -> Result<Option<Assignment>, sqlx::Error> {
    let now = Utc::now();
    let affected = sqlx::query(
        r#"
        UPDATE assignments
        SET course_id = ?1,
            name = ?2,
            description = ?3,
            due_date = ?4,
            updated_at = ?5
        WHERE id = ?6
        "#,
    )
    .bind(&fields.course_id)
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.due_date)
    .bind(now)
    .bind(id)
    .execute(db)
    .await?
    .rows_affected();

    if affected == 0 {
        return Ok(None);
    }
    find_by_id::<Assignment>(db, id).await
}

pub async fn fetch_profile(db: &SqlitePool) -> Result<ProfileRow, sqlx::Error> {
    let row = sqlx::query_as::<_, ProfileRow>("SELECT name, picture FROM profile WHERE id = 1")
        .fetch_optional(db)
        .await?;
    Ok(row.unwrap_or_default())
}

pub async fn set_profile_name(db: &SqlitePool, name: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO profile (id, name, updated_at) VALUES (1, ?1, ?2)
        ON CONFLICT(id) DO UPDATE SET name = excluded.name, updated_at = excluded.updated_at
        "#,
    )
    .bind(name)
    .bind(Utc::now())
    .execute(db)
    .await?;
    Ok(())
}

pub async fn set_profile_picture(db: &SqlitePool, picture: &[u8]) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO profile (id, picture, updated_at) VALUES (1, ?1, ?2)
        ON CONFLICT(id) DO UPDATE SET picture = excluded.picture, updated_at = excluded.updated_at
        "#,
    )
    .bind(picture)
    .bind(Utc::now())
    .execute(db)
    .await?;
    Ok(())
}
