//! Reservation API

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use shared::error::{AppError, ErrorCode};
use shared::models::{Reservation, ReservationCreate, ReservationUpdate};
use shared::util::now_millis;

use super::{ApiResult, AppJson, admin_only, user_only};
use crate::auth::CurrentUser;
use crate::state::AppState;
use crate::utils::validation::{
    MAX_NOTE_LEN, parse_identifier, validate_optional_text, validate_range,
};

pub const MIN_PARTY_SIZE: i32 = 1;
pub const MAX_PARTY_SIZE: i32 = 50;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new().nest("/api/reservations", routes(state))
}

fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            user_only(state, post(create)).merge(admin_only(state, get(list))),
        )
        .route("/my-reservations", user_only(state, get(list_mine)))
        .route("/{id}", admin_only(state, put(update)))
}

fn validate_party(party_size: Option<i32>, special_requests: &Option<String>) -> Result<(), AppError> {
    if let Some(size) = party_size {
        validate_range(size, "party_size", MIN_PARTY_SIZE, MAX_PARTY_SIZE)?;
    }
    validate_optional_text(special_requests, "special_requests", MAX_NOTE_LEN)
}

/// POST /api/reservations
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    AppJson(payload): AppJson<ReservationCreate>,
) -> Result<(StatusCode, Json<Reservation>), AppError> {
    validate_party(Some(payload.party_size), &payload.special_requests)?;

    let reservation = state
        .store
        .create_reservation(user.id, &payload, now_millis())
        .await?;
    tracing::info!(
        reservation_id = %reservation.id,
        user_id = %user.id,
        date = %reservation.date,
        time = %reservation.time,
        party_size = reservation.party_size,
        "Reservation created"
    );
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// GET /api/reservations - every reservation, with owner summaries
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Reservation>> {
    Ok(Json(state.store.list_reservations(None).await?))
}

/// GET /api/reservations/my-reservations
pub async fn list_mine(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Vec<Reservation>> {
    Ok(Json(state.store.list_reservations(Some(user.id)).await?))
}

/// PUT /api/reservations/{id} - partial update, any status may follow any other
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ReservationUpdate>,
) -> ApiResult<Reservation> {
    let id = parse_identifier(&id)?;
    validate_party(payload.party_size, &payload.special_requests)?;

    let reservation = state
        .store
        .update_reservation(id, &payload, now_millis())
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ReservationNotFound,
                format!("Reservation {id} not found"),
            )
            .with_detail("reservation_id", id.to_string())
        })?;
    tracing::info!(reservation_id = %id, status = %reservation.status, "Reservation updated");
    Ok(Json(reservation))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::TestApp;
    use http::StatusCode;
    use serde_json::json;
    use shared::models::{UserRole, UserSummary};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_reservation_flow() {
        let app = TestApp::new();
        let guest = UserSummary {
            id: Uuid::new_v4(),
            name: "Grace".into(),
            email: "grace@example.com".into(),
            phone: None,
        };
        app.store.add_user(guest.clone());
        let token = app.token(guest.id, UserRole::Customer);
        let admin = app.admin_token();

        let (status, early) = app
            .call(
                "POST",
                "/api/reservations",
                Some(&token),
                Some(json!({"date": "2026-05-01", "time": "19:30:00", "party_size": 4})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(early["status"], "pending");
        assert_eq!(early["party_size"], 4);

        app.call(
            "POST",
            "/api/reservations",
            Some(&token),
            Some(json!({
                "date": "2026-06-01",
                "time": "12:00:00",
                "party_size": 2,
                "special_requests": "Window seat",
            })),
        )
        .await;

        let (status, mine) = app
            .call("GET", "/api/reservations/my-reservations", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let mine = mine.as_array().unwrap();
        assert_eq!(mine.len(), 2);
        // Latest date first
        assert_eq!(mine[0]["date"], "2026-06-01");

        let (status, _) = app.call("GET", "/api/reservations", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, all) = app.call("GET", "/api/reservations", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all[1]["user"]["name"], "Grace");

        let uri = format!("/api/reservations/{}", early["id"].as_str().unwrap());
        let (status, updated) = app
            .call(
                "PUT",
                &uri,
                Some(&admin),
                Some(json!({"status": "confirmed", "party_size": 6})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "confirmed");
        assert_eq!(updated["party_size"], 6);
        assert_eq!(updated["time"], "19:30:00");

        let missing = format!("/api/reservations/{}", Uuid::new_v4());
        let (status, body) = app
            .call("PUT", &missing, Some(&admin), Some(json!({"status": "cancelled"})))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 7001);
    }

    #[tokio::test]
    async fn test_reservation_validation() {
        let app = TestApp::new();
        let token = app.token(Uuid::new_v4(), UserRole::Customer);

        for party_size in [0, 51] {
            let (status, body) = app
                .call(
                    "POST",
                    "/api/reservations",
                    Some(&token),
                    Some(json!({"date": "2026-05-01", "time": "19:30:00", "party_size": party_size})),
                )
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["code"], 8);
        }

        let (status, body) = app
            .call(
                "POST",
                "/api/reservations",
                Some(&token),
                Some(json!({
                    "date": "2026-05-01",
                    "time": "19:30:00",
                    "party_size": 2,
                    "special_requests": "x".repeat(501),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 2);

        let (status, body) = app
            .call(
                "POST",
                "/api/reservations",
                Some(&token),
                Some(json!({"date": "tomorrow", "time": "19:30:00", "party_size": 2})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 5);
    }
}
