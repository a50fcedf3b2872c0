//! Category database operations

use shared::error::{AppError, ErrorCode};
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use sqlx::PgPool;
use uuid::Uuid;

use super::is_unique_violation;
use crate::error::{ServiceError, ServiceResult};

const CATEGORY_COLUMNS: &str =
    "id, name, description, image, sort_order, is_active, created_at, updated_at";

fn name_conflict(e: sqlx::Error, name: Option<&str>) -> ServiceError {
    if !is_unique_violation(&e) {
        return e.into();
    }
    match name {
        Some(name) => AppError::with_message(
            ErrorCode::CategoryNameExists,
            format!("Category '{name}' already exists"),
        )
        .with_detail("name", name)
        .into(),
        None => AppError::new(ErrorCode::CategoryNameExists).into(),
    }
}

pub async fn list_active(pool: &PgPool) -> ServiceResult<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories WHERE is_active ORDER BY sort_order, name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, data: &CategoryCreate, now: i64) -> ServiceResult<Category> {
    sqlx::query_as::<_, Category>(&format!(
        r#"
        INSERT INTO categories (id, name, description, image, sort_order, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING {CATEGORY_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.image)
    .bind(data.sort_order.unwrap_or(0))
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| name_conflict(e, Some(&data.name)))
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    data: &CategoryUpdate,
    now: i64,
) -> ServiceResult<Option<Category>> {
    sqlx::query_as::<_, Category>(&format!(
        r#"
        UPDATE categories SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            image = COALESCE($4, image),
            sort_order = COALESCE($5, sort_order),
            is_active = COALESCE($6, is_active),
            updated_at = $7
        WHERE id = $1
        RETURNING {CATEGORY_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.image)
    .bind(data.sort_order)
    .bind(data.is_active)
    .bind(now)
    .fetch_optional(pool)
    .await
    .map_err(|e| name_conflict(e, data.name.as_deref()))
}
