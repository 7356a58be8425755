use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// `ends_at` is always derived from the movie runtime plus the fixed
// turnaround buffer, never supplied by the client.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Showtime {
    pub id: i64,
    pub movie_id: i64,
    pub room_id: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub total_seats: i32,
    pub available_seats: i32,
    pub created_at: DateTime<Utc>,
}
