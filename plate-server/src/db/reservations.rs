//! Reservation database operations

use shared::models::{Reservation, ReservationCreate, ReservationStatus, ReservationUpdate, UserSummary};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ServiceResult;

const RESERVATION_COLUMNS: &str =
    "id, user_id, date, time, party_size, special_requests, status, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ReservationRow {
    #[sqlx(flatten)]
    reservation: Reservation,
    user_name: Option<String>,
    user_email: Option<String>,
    user_phone: Option<String>,
}

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    data: &ReservationCreate,
    now: i64,
) -> ServiceResult<Reservation> {
    let reservation = sqlx::query_as::<_, Reservation>(&format!(
        r#"
        INSERT INTO reservations (id, user_id, date, time, party_size, special_requests, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING {RESERVATION_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(data.date)
    .bind(data.time)
    .bind(data.party_size)
    .bind(&data.special_requests)
    .bind(ReservationStatus::Pending)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(reservation)
}

pub async fn list(pool: &PgPool, user_id: Option<Uuid>) -> ServiceResult<Vec<Reservation>> {
    let rows: Vec<ReservationRow> = sqlx::query_as(
        r#"
        SELECT r.id, r.user_id, r.date, r.time, r.party_size, r.special_requests, r.status,
               r.created_at, r.updated_at,
               u.name AS user_name, u.email AS user_email, u.phone AS user_phone
        FROM reservations r
        LEFT JOIN users u ON u.id = r.user_id
        WHERE ($1::uuid IS NULL OR r.user_id = $1)
        ORDER BY r.date DESC, r.time DESC, r.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    // Owner summaries only for the all-users listing
    let with_user = user_id.is_none();
    Ok(rows
        .into_iter()
        .map(|row| {
            let mut reservation = row.reservation;
            if with_user && let (Some(name), Some(email)) = (row.user_name, row.user_email) {
                reservation.user = Some(UserSummary {
                    id: reservation.user_id,
                    name,
                    email,
                    phone: row.user_phone,
                });
            }
            reservation
        })
        .collect())
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    data: &ReservationUpdate,
    now: i64,
) -> ServiceResult<Option<Reservation>> {
    let reservation = sqlx::query_as::<_, Reservation>(&format!(
        r#"
        UPDATE reservations SET
            date = COALESCE($2, date),
            time = COALESCE($3, time),
            party_size = COALESCE($4, party_size),
            special_requests = COALESCE($5, special_requests),
            status = COALESCE($6, status),
            updated_at = $7
        WHERE id = $1
        RETURNING {RESERVATION_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(data.date)
    .bind(data.time)
    .bind(data.party_size)
    .bind(&data.special_requests)
    .bind(data.status)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(reservation)
}
