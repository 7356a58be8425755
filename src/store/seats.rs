use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor};

use crate::models::{Reservation, Seat};

// Fails on the (showtime_id, seat_number) unique constraint when the
// seat is already taken; callers map that to a Conflict.
pub async fn insert_seat(
    ex: impl PgExecutor<'_>,
    showtime_id: i64,
    seat_number: i32,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO seats (showtime_id, seat_number) VALUES ($1, $2) RETURNING id",
    )
    .bind(showtime_id)
    .bind(seat_number)
    .fetch_one(ex)
    .await
}

pub async fn delete_seat(ex: impl PgExecutor<'_>, seat_id: i64) -> sqlx::Result<bool> {
    sqlx::query("DELETE FROM seats WHERE id = $1")
        .bind(seat_id)
        .execute(ex)
        .await
        .map(|r| r.rows_affected() > 0)
}

// Same unique constraint decides reassignment races
pub async fn move_seat(
    ex: impl PgExecutor<'_>,
    seat_id: i64,
    new_seat_number: i32,
) -> sqlx::Result<bool> {
    sqlx::query("UPDATE seats SET seat_number = $2 WHERE id = $1")
        .bind(seat_id)
        .bind(new_seat_number)
        .execute(ex)
        .await
        .map(|r| r.rows_affected() > 0)
}

pub async fn list_for_showtime(
    ex: impl PgExecutor<'_>,
    showtime_id: i64,
) -> sqlx::Result<Vec<Seat>> {
    sqlx::query_as::<_, Seat>(
        "SELECT id, showtime_id, seat_number FROM seats WHERE showtime_id = $1 ORDER BY seat_number",
    )
    .bind(showtime_id)
    .fetch_all(ex)
    .await
}

// Occupancy summary: how many seats are taken and the highest taken
// seat number (0 when the showtime is empty).
pub async fn occupancy(ex: impl PgExecutor<'_>, showtime_id: i64) -> sqlx::Result<(i64, i32)> {
    sqlx::query_as::<_, (i64, i32)>(
        "SELECT COUNT(*), COALESCE(MAX(seat_number), 0) FROM seats WHERE showtime_id = $1",
    )
    .bind(showtime_id)
    .fetch_one(ex)
    .await
}

pub async fn insert_reservation(
    ex: impl PgExecutor<'_>,
    user_id: i64,
    showtime_id: i64,
    seat_id: i64,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO reservations (user_id, showtime_id, seat_id)
         VALUES ($1, $2, $3)
         RETURNING id",
    )
    .bind(user_id)
    .bind(showtime_id)
    .bind(seat_id)
    .fetch_one(ex)
    .await
}

// Owner-filtered lookup: a missing row and someone else's row are
// indistinguishable to the caller.
pub async fn get_reservation_owned(
    ex: impl PgExecutor<'_>,
    reservation_id: i64,
    user_id: i64,
) -> sqlx::Result<Option<Reservation>> {
    sqlx::query_as::<_, Reservation>(
        "SELECT id, user_id, showtime_id, seat_id, reserved_at
         FROM reservations
         WHERE id = $1 AND user_id = $2",
    )
    .bind(reservation_id)
    .bind(user_id)
    .fetch_optional(ex)
    .await
}

pub async fn delete_reservation_owned(
    ex: impl PgExecutor<'_>,
    reservation_id: i64,
    user_id: i64,
) -> sqlx::Result<Option<Reservation>> {
    sqlx::query_as::<_, Reservation>(
        "DELETE FROM reservations
         WHERE id = $1 AND user_id = $2
         RETURNING id, user_id, showtime_id, seat_id, reserved_at",
    )
    .bind(reservation_id)
    .bind(user_id)
    .fetch_optional(ex)
    .await
}

// Reservation joined with its seat, for the user-facing listing
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct UserReservation {
    pub id: i64,
    pub showtime_id: i64,
    pub seat_number: i32,
    pub reserved_at: DateTime<Utc>,
}

pub async fn list_for_user(
    ex: impl PgExecutor<'_>,
    user_id: i64,
) -> sqlx::Result<Vec<UserReservation>> {
    sqlx::query_as::<_, UserReservation>(
        "SELECT r.id, r.showtime_id, s.seat_number, r.reserved_at
         FROM reservations r
         JOIN seats s ON s.id = r.seat_id
         WHERE r.user_id = $1
         ORDER BY r.reserved_at DESC",
    )
    .bind(user_id)
    .fetch_all(ex)
    .await
}
