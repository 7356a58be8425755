use sqlx::PgExecutor;

use crate::models::Room;

// Locks the room row for the rest of the transaction; concurrent
// schedulers for the same room serialize on this.
pub async fn capacity_for_update(
    ex: impl PgExecutor<'_>,
    room_id: i64,
) -> sqlx::Result<Option<i32>> {
    sqlx::query_scalar::<_, i32>("SELECT capacity FROM rooms WHERE id = $1 FOR UPDATE")
        .bind(room_id)
        .fetch_optional(ex)
        .await
}

pub async fn insert(ex: impl PgExecutor<'_>, name: &str, capacity: i32) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO rooms (name, capacity) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(capacity)
    .fetch_one(ex)
    .await
}

pub async fn list(ex: impl PgExecutor<'_>) -> sqlx::Result<Vec<Room>> {
    sqlx::query_as::<_, Room>("SELECT id, name, capacity, created_at FROM rooms ORDER BY id")
        .fetch_all(ex)
        .await
}
