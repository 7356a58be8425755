use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Occupancy record: seat_number is taken for this showtime
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Seat {
    pub id: i64,
    pub showtime_id: i64,
    pub seat_number: i32,
}
