use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor};

use crate::models::Showtime;

// Interval slice of a showtime, enough for overlap checks
#[derive(Debug, Clone, FromRow)]
pub struct ShowtimeWindow {
    pub id: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

pub async fn windows_in_room(
    ex: impl PgExecutor<'_>,
    room_id: i64,
) -> sqlx::Result<Vec<ShowtimeWindow>> {
    sqlx::query_as::<_, ShowtimeWindow>(
        "SELECT id, starts_at, ends_at FROM showtimes WHERE room_id = $1 ORDER BY starts_at",
    )
    .bind(room_id)
    .fetch_all(ex)
    .await
}

pub async fn get(ex: impl PgExecutor<'_>, id: i64) -> sqlx::Result<Option<Showtime>> {
    sqlx::query_as::<_, Showtime>(
        "SELECT id, movie_id, room_id, starts_at, ends_at, total_seats, available_seats, created_at
         FROM showtimes
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(ex)
    .await
}

// Locks the showtime row for the rest of the transaction. Every writer
// that reads or rebuilds this showtime's occupancy takes this lock, so
// counter rebuilds and seat writes serialize instead of interleaving.
pub async fn get_for_update(ex: impl PgExecutor<'_>, id: i64) -> sqlx::Result<Option<Showtime>> {
    sqlx::query_as::<_, Showtime>(
        "SELECT id, movie_id, room_id, starts_at, ends_at, total_seats, available_seats, created_at
         FROM showtimes
         WHERE id = $1
         FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(ex)
    .await
}

pub async fn list(ex: impl PgExecutor<'_>, room_id: Option<i64>) -> sqlx::Result<Vec<Showtime>> {
    match room_id {
        Some(room_id) => {
            sqlx::query_as::<_, Showtime>(
                "SELECT id, movie_id, room_id, starts_at, ends_at, total_seats, available_seats, created_at
                 FROM showtimes
                 WHERE room_id = $1
                 ORDER BY starts_at",
            )
            .bind(room_id)
            .fetch_all(ex)
            .await
        }
        None => {
            sqlx::query_as::<_, Showtime>(
                "SELECT id, movie_id, room_id, starts_at, ends_at, total_seats, available_seats, created_at
                 FROM showtimes
                 ORDER BY starts_at",
            )
            .fetch_all(ex)
            .await
        }
    }
}

// New showtimes start with every seat available
pub async fn insert(
    ex: impl PgExecutor<'_>,
    movie_id: i64,
    room_id: i64,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    total_seats: i32,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO showtimes (movie_id, room_id, starts_at, ends_at, total_seats, available_seats)
         VALUES ($1, $2, $3, $4, $5, $5)
         RETURNING id",
    )
    .bind(movie_id)
    .bind(room_id)
    .bind(starts_at)
    .bind(ends_at)
    .bind(total_seats)
    .fetch_one(ex)
    .await
}

#[allow(clippy::too_many_arguments)]
pub async fn update(
    ex: impl PgExecutor<'_>,
    id: i64,
    movie_id: i64,
    room_id: i64,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    total_seats: i32,
    available_seats: i32,
) -> sqlx::Result<bool> {
    sqlx::query(
        "UPDATE showtimes
         SET movie_id = $2, room_id = $3, starts_at = $4, ends_at = $5,
             total_seats = $6, available_seats = $7
         WHERE id = $1",
    )
    .bind(id)
    .bind(movie_id)
    .bind(room_id)
    .bind(starts_at)
    .bind(ends_at)
    .bind(total_seats)
    .bind(available_seats)
    .execute(ex)
    .await
    .map(|r| r.rows_affected() > 0)
}

pub async fn delete(ex: impl PgExecutor<'_>, id: i64) -> sqlx::Result<bool> {
    sqlx::query("DELETE FROM showtimes WHERE id = $1")
        .bind(id)
        .execute(ex)
        .await
        .map(|r| r.rows_affected() > 0)
}

// Atomic counter move, guarded so it can never leave the
// 0..=total_seats range. Returns false when the guard blocks it.
pub async fn adjust_available_seats(
    ex: impl PgExecutor<'_>,
    id: i64,
    delta: i32,
) -> sqlx::Result<bool> {
    sqlx::query(
        "UPDATE showtimes
         SET available_seats = available_seats + $2
         WHERE id = $1 AND available_seats + $2 BETWEEN 0 AND total_seats",
    )
    .bind(id)
    .bind(delta)
    .execute(ex)
    .await
    .map(|r| r.rows_affected() > 0)
}
