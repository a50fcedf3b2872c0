//! Menu item database operations

use shared::error::{AppError, ErrorCode};
use shared::models::{CategorySummary, MenuItem, MenuItemCreate, MenuItemQuery, MenuItemUpdate};
use sqlx::PgPool;
use uuid::Uuid;

use super::{escape_like, is_foreign_key_violation};
use crate::error::{ServiceError, ServiceResult};

const MENU_ITEM_SELECT: &str = r#"
    SELECT m.id, m.name, m.description, m.price, m.category_id, m.discount_price, m.image,
           m.rating, m.reviews, m.is_vegetarian, m.is_available, m.preparation_time, m.tags,
           m.badge, m.discount, m.created_at, m.updated_at,
           c.name AS category_name
    FROM menu_items m
    LEFT JOIN categories c ON c.id = m.category_id
"#;

#[derive(sqlx::FromRow)]
struct MenuItemRow {
    #[sqlx(flatten)]
    item: MenuItem,
    category_name: Option<String>,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        let mut item = row.item;
        item.category = match (item.category_id, row.category_name) {
            (Some(id), Some(name)) => Some(CategorySummary { id, name }),
            _ => None,
        };
        item
    }
}

fn category_missing(e: sqlx::Error, category_id: Option<Uuid>) -> ServiceError {
    match category_id {
        Some(id) if is_foreign_key_violation(&e) => AppError::with_message(
            ErrorCode::CategoryNotFound,
            format!("Category with ID {id} not found"),
        )
        .with_detail("category_id", id.to_string())
        .into(),
        _ => e.into(),
    }
}

pub async fn list(pool: &PgPool, query: &MenuItemQuery) -> ServiceResult<Vec<MenuItem>> {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", escape_like(s)));

    let rows: Vec<MenuItemRow> = sqlx::query_as(&format!(
        r#"
        {MENU_ITEM_SELECT}
        WHERE ($1::uuid IS NULL OR m.category_id = $1)
          AND ($2::text IS NULL OR m.name ILIKE $2)
        ORDER BY m.created_at DESC, m.id
        "#
    ))
    .bind(query.category)
    .bind(search)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(MenuItem::from).collect())
}

pub async fn find(pool: &PgPool, id: Uuid) -> ServiceResult<Option<MenuItem>> {
    let row: Option<MenuItemRow> =
        sqlx::query_as(&format!("{MENU_ITEM_SELECT} WHERE m.id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(MenuItem::from))
}

/// Batch lookup used to expand order line items
pub async fn find_many(pool: &PgPool, ids: &[Uuid]) -> ServiceResult<Vec<MenuItem>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let rows: Vec<MenuItemRow> =
        sqlx::query_as(&format!("{MENU_ITEM_SELECT} WHERE m.id = ANY($1)"))
            .bind(ids)
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(MenuItem::from).collect())
}

pub async fn create(pool: &PgPool, data: &MenuItemCreate, now: i64) -> ServiceResult<MenuItem> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO menu_items (
            id, name, description, price, category_id, discount_price, image,
            rating, reviews, is_vegetarian, is_available, preparation_time, tags,
            badge, discount, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $16)
        "#,
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.category_id)
    .bind(data.discount_price)
    .bind(&data.image)
    .bind(data.rating.unwrap_or_default())
    .bind(data.reviews.unwrap_or(0))
    .bind(data.is_vegetarian.unwrap_or(false))
    .bind(data.is_available.unwrap_or(true))
    .bind(data.preparation_time)
    .bind(data.tags.clone().unwrap_or_default())
    .bind(&data.badge)
    .bind(data.discount)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| category_missing(e, data.category_id))?;

    find(pool, id)
        .await?
        .ok_or_else(|| AppError::internal("Menu item vanished after insert").into())
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    data: &MenuItemUpdate,
    now: i64,
) -> ServiceResult<Option<MenuItem>> {
    let updated = sqlx::query(
        r#"
        UPDATE menu_items SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            price = COALESCE($4, price),
            category_id = COALESCE($5, category_id),
            discount_price = COALESCE($6, discount_price),
            image = COALESCE($7, image),
            rating = COALESCE($8, rating),
            reviews = COALESCE($9, reviews),
            is_vegetarian = COALESCE($10, is_vegetarian),
            is_available = COALESCE($11, is_available),
            preparation_time = COALESCE($12, preparation_time),
            tags = COALESCE($13, tags),
            badge = COALESCE($14, badge),
            discount = COALESCE($15, discount),
            updated_at = $16
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.category_id)
    .bind(data.discount_price)
    .bind(&data.image)
    .bind(data.rating)
    .bind(data.reviews)
    .bind(data.is_vegetarian)
    .bind(data.is_available)
    .bind(data.preparation_time)
    .bind(&data.tags)
    .bind(&data.badge)
    .bind(data.discount)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| category_missing(e, data.category_id))?;

    if updated.rows_affected() == 0 {
        return Ok(None);
    }
    find(pool, id).await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
