//! Menu item API
//!
//! Reads are public; writes require the admin role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{MenuItem, MenuItemCreate, MenuItemQuery, MenuItemUpdate};
use shared::util::now_millis;
use uuid::Uuid;

use super::{ApiResult, AppJson, AppQuery, admin_only};
use crate::state::AppState;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, parse_identifier,
    validate_optional_text, validate_range, validate_required_text,
};

const MAX_RATING: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
const MAX_PRICE: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new().nest("/api/menu", routes(state))
}

fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list).merge(admin_only(state, post(create))))
        .route(
            "/{id}",
            get(get_by_id).merge(admin_only(state, put(update).merge(delete(remove)))),
        )
}

/// Field checks shared by create and update; `None` means "not supplied"
struct MenuFields<'a> {
    price: Option<Decimal>,
    discount_price: Option<Decimal>,
    rating: Option<Decimal>,
    discount: Option<i32>,
    reviews: Option<i32>,
    preparation_time: Option<i32>,
    description: &'a Option<String>,
    image: &'a Option<String>,
    badge: &'a Option<String>,
    tags: Option<&'a [String]>,
}

fn validate_fields(f: MenuFields<'_>) -> Result<(), AppError> {
    if let Some(price) = f.price {
        validate_range(price, "price", Decimal::ZERO, MAX_PRICE)?;
    }
    if let Some(price) = f.discount_price {
        validate_range(price, "discount_price", Decimal::ZERO, MAX_PRICE)?;
    }
    if let Some(rating) = f.rating {
        validate_range(rating, "rating", Decimal::ZERO, MAX_RATING)?;
    }
    if let Some(discount) = f.discount {
        validate_range(discount, "discount", 0, 100)?;
    }
    if let Some(reviews) = f.reviews {
        validate_range(reviews, "reviews", 0, i32::MAX)?;
    }
    if let Some(minutes) = f.preparation_time {
        validate_range(minutes, "preparation_time", 0, 24 * 60)?;
    }
    validate_optional_text(f.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(f.image, "image", MAX_URL_LEN)?;
    validate_optional_text(f.badge, "badge", MAX_SHORT_TEXT_LEN)?;
    for tag in f.tags.unwrap_or_default() {
        validate_required_text(tag, "tags", MAX_SHORT_TEXT_LEN)?;
    }
    Ok(())
}

fn validate_create(payload: &MenuItemCreate) -> Result<(), AppError> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_fields(MenuFields {
        price: Some(payload.price),
        discount_price: payload.discount_price,
        rating: payload.rating,
        discount: payload.discount,
        reviews: payload.reviews,
        preparation_time: payload.preparation_time,
        description: &payload.description,
        image: &payload.image,
        badge: &payload.badge,
        tags: payload.tags.as_deref(),
    })
}

fn validate_update(payload: &MenuItemUpdate) -> Result<(), AppError> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_fields(MenuFields {
        price: payload.price,
        discount_price: payload.discount_price,
        rating: payload.rating,
        discount: payload.discount,
        reviews: payload.reviews,
        preparation_time: payload.preparation_time,
        description: &payload.description,
        image: &payload.image,
        badge: &payload.badge,
        tags: payload.tags.as_deref(),
    })
}

fn menu_item_not_found(id: Uuid) -> AppError {
    AppError::with_message(
        ErrorCode::MenuItemNotFound,
        format!("Menu item with ID {id} not found"),
    )
    .with_detail("menu_item_id", id.to_string())
}

/// GET /api/menu?category=<id>&search=<text>
pub async fn list(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<MenuItemQuery>,
) -> ApiResult<Vec<MenuItem>> {
    let items = state.store.list_menu_items(&query).await?;
    Ok(Json(items))
}

/// GET /api/menu/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MenuItem> {
    let id = parse_identifier(&id)?;
    let item = state
        .store
        .find_menu_item(id)
        .await?
        .ok_or_else(|| menu_item_not_found(id))?;
    Ok(Json(item))
}

/// POST /api/menu
pub async fn create(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<MenuItemCreate>,
) -> Result<(StatusCode, Json<MenuItem>), AppError> {
    payload.name = payload.name.trim().to_string();
    validate_create(&payload)?;

    let item = state.store.create_menu_item(&payload, now_millis()).await?;
    tracing::info!(menu_item_id = %item.id, name = %item.name, price = %item.price, "Menu item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/menu/{id} - partial update
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(mut payload): AppJson<MenuItemUpdate>,
) -> ApiResult<MenuItem> {
    let id = parse_identifier(&id)?;
    if let Some(name) = payload.name.as_mut() {
        *name = name.trim().to_string();
    }
    validate_update(&payload)?;

    let item = state
        .store
        .update_menu_item(id, &payload, now_millis())
        .await?
        .ok_or_else(|| menu_item_not_found(id))?;
    tracing::info!(menu_item_id = %id, "Menu item updated");
    Ok(Json(item))
}

/// DELETE /api/menu/{id} - hard delete; order lines keep their snapshot
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<serde_json::Value> {
    let id = parse_identifier(&id)?;
    if !state.store.delete_menu_item(id).await? {
        return Err(menu_item_not_found(id));
    }
    tracing::info!(menu_item_id = %id, "Menu item deleted");
    Ok(Json(serde_json::json!({ "message": "Menu item deleted" })))
}
