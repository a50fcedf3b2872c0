//! Category API
//!
//! Listing is public; writes require the admin role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use shared::error::{AppError, ErrorCode};
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::util::now_millis;

use super::{ApiResult, AppJson, admin_only};
use crate::state::AppState;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, parse_identifier, validate_optional_text,
    validate_required_text,
};

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new().nest("/api/categories", routes(state))
}

fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list).merge(admin_only(state, post(create))))
        .route("/{id}", admin_only(state, put(update)))
}

fn validate_create(payload: &CategoryCreate) -> Result<(), AppError> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    Ok(())
}

fn validate_update(payload: &CategoryUpdate) -> Result<(), AppError> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    Ok(())
}

/// GET /api/categories - active categories by sort order
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = state.store.list_categories().await?;
    Ok(Json(categories))
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<CategoryCreate>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    payload.name = payload.name.trim().to_string();
    validate_create(&payload)?;

    let category = state.store.create_category(&payload, now_millis()).await?;
    tracing::info!(category_id = %category.id, name = %category.name, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/{id} - partial update
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(mut payload): AppJson<CategoryUpdate>,
) -> ApiResult<Category> {
    let id = parse_identifier(&id)?;
    if let Some(name) = payload.name.as_mut() {
        *name = name.trim().to_string();
    }
    validate_update(&payload)?;

    let category = state
        .store
        .update_category(id, &payload, now_millis())
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
                .with_detail("category_id", id.to_string())
        })?;
    Ok(Json(category))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::TestApp;
    use http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_and_list_categories() {
        let app = TestApp::new();
        let admin = app.admin_token();

        let (status, body) = app
            .call(
                "POST",
                "/api/categories",
                Some(&admin),
                Some(json!({"name": "Pizza", "sort_order": 2})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Pizza");
        assert_eq!(body["is_active"], true);

        app.call(
            "POST",
            "/api/categories",
            Some(&admin),
            Some(json!({"name": "Drinks", "sort_order": 1})),
        )
        .await;
        app.call(
            "POST",
            "/api/categories",
            Some(&admin),
            Some(json!({"name": "Hidden", "is_active": false})),
        )
        .await;

        let (status, body) = app.call("GET", "/api/categories", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Drinks", "Pizza"]);
    }

    #[tokio::test]
    async fn test_duplicate_active_name_conflicts() {
        let app = TestApp::new();
        let admin = app.admin_token();
        app.call(
            "POST",
            "/api/categories",
            Some(&admin),
            Some(json!({"name": "Desserts"})),
        )
        .await;

        let (status, body) = app
            .call(
                "POST",
                "/api/categories",
                Some(&admin),
                Some(json!({"name": "desserts"})),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], 6103);
    }

    #[tokio::test]
    async fn test_create_requires_admin_and_name() {
        let app = TestApp::new();
        let (status, _) = app
            .call("POST", "/api/categories", None, Some(json!({"name": "X"})))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let admin = app.admin_token();
        let (status, body) = app
            .call(
                "POST",
                "/api/categories",
                Some(&admin),
                Some(json!({"name": "  "})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 7);
    }

    #[tokio::test]
    async fn test_update_category() {
        let app = TestApp::new();
        let admin = app.admin_token();
        let (_, created) = app
            .call(
                "POST",
                "/api/categories",
                Some(&admin),
                Some(json!({"name": "Soups", "description": "Hot"})),
            )
            .await;
        let uri = format!("/api/categories/{}", created["id"].as_str().unwrap());

        let (status, body) = app
            .call("PUT", &uri, Some(&admin), Some(json!({"sort_order": 5})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sort_order"], 5);
        assert_eq!(body["name"], "Soups");
        assert_eq!(body["description"], "Hot");

        let missing = format!("/api/categories/{}", uuid::Uuid::new_v4());
        let (status, body) = app
            .call("PUT", &missing, Some(&admin), Some(json!({"name": "Y"})))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 6101);

        let (status, body) = app
            .call(
                "PUT",
                "/api/categories/not-an-id",
                Some(&admin),
                Some(json!({"name": "Y"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 6);
    }
}
