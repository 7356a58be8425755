use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub runtime_seconds: i32,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub poster_url: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

// Insert payload, already validated at the handler boundary
#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub runtime_seconds: i32,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub poster_url: Option<String>,
    pub release_date: Option<NaiveDate>,
}
