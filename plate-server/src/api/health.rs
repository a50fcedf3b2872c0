//! Health check endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use shared::error::ErrorCode;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health_check))
}

/// GET /api/health - pings the database on every call
pub async fn health_check(State(state): State<AppState>) -> Response {
    let (status, code, database) = match state.store.ping().await {
        Ok(()) => ("ok", StatusCode::OK, "connected"),
        Err(e) => {
            tracing::warn!(error = ?e, "Health check: database unreachable");
            ("degraded", StatusCode::SERVICE_UNAVAILABLE, "unreachable")
        }
    };

    let mut body = serde_json::json!({
        "status": status,
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
    });
    if code != StatusCode::OK {
        body["code"] = ErrorCode::StoreUnavailable.code().into();
    }
    (code, Json(body)).into_response()
}
