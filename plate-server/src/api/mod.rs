//! HTTP API for plate-server

pub mod category;
pub mod extract;
pub mod health;
pub mod menu;
pub mod order;
pub mod reservation;

use axum::http::{HeaderValue, Method, header};
use axum::routing::{MethodRouter, get};
use axum::{Json, Router, middleware};
use shared::error::AppError;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{require_admin, require_auth};
use crate::state::AppState;

pub use extract::{ApiResult, AppJson, AppQuery};

/// Restrict a route to authenticated callers
pub(crate) fn user_only(state: &AppState, route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

/// Restrict a route to callers with the admin role
pub(crate) fn admin_only(
    state: &AppState,
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
}

/// Build a router with all routes registered (no global middleware)
pub fn build_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(service_info))
        .merge(health::router())
        .merge(category::router(state))
        .merge(menu::router(state))
        .merge(order::router(state))
        .merge(reservation::router(state))
        .fallback(not_found)
}

/// Build the fully configured application
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);
    build_router(&state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// GET / - service name, version and endpoint map
async fn service_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Restaurant API",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "menu": "/api/menu",
            "categories": "/api/categories",
            "orders": "/api/orders",
            "reservations": "/api/reservations",
        },
    }))
}

async fn not_found() -> AppError {
    AppError::not_found("Route")
}
