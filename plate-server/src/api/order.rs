//! Order API

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use shared::error::AppError;
use shared::models::{OrderCreate, OrderDetail, OrderQuery, OrderStats, OrderStatusUpdate};

use super::{ApiResult, AppJson, AppQuery, admin_only, user_only};
use crate::auth::CurrentUser;
use crate::orders;
use crate::state::AppState;
use crate::utils::validation::parse_identifier;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new().nest("/api/orders", routes(state))
}

fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            user_only(state, post(create)).merge(admin_only(state, get(list))),
        )
        .route("/my-orders", user_only(state, get(list_mine)))
        .route("/stats", admin_only(state, get(stats)))
        .route("/{id}/status", admin_only(state, put(update_status)))
}

/// POST /api/orders
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    AppJson(payload): AppJson<OrderCreate>,
) -> Result<(StatusCode, Json<OrderDetail>), AppError> {
    let detail = orders::create_order(state.store.as_ref(), user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/orders?status=<status> - every order, with owner summaries
pub async fn list(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<OrderQuery>,
) -> ApiResult<Vec<OrderDetail>> {
    let status = orders::parse_status_filter(query.status.as_deref())?;
    let orders = orders::list_orders(state.store.as_ref(), status).await?;
    Ok(Json(orders))
}

/// GET /api/orders/my-orders
pub async fn list_mine(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Vec<OrderDetail>> {
    let orders = orders::list_user_orders(state.store.as_ref(), user.id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<OrderStats> {
    Ok(Json(orders::order_stats(state.store.as_ref()).await?))
}

/// PUT /api/orders/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<OrderStatusUpdate>,
) -> ApiResult<OrderDetail> {
    let id = parse_identifier(&id)?;
    let detail = orders::update_order_status(state.store.as_ref(), id, payload.status).await?;
    Ok(Json(detail))
}
