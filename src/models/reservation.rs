use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Owns exactly one seat occupancy record; both live and die together.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub user_id: i64,
    pub showtime_id: i64,
    pub seat_id: i64,
    pub reserved_at: DateTime<Utc>,
}
