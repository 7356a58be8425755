use sqlx::PgExecutor;

use crate::models::{Movie, NewMovie};

// Runtime lookup used by the scheduler to derive showtime ends
pub async fn runtime(ex: impl PgExecutor<'_>, movie_id: i64) -> sqlx::Result<Option<i32>> {
    sqlx::query_scalar::<_, i32>("SELECT runtime_seconds FROM movies WHERE id = $1")
        .bind(movie_id)
        .fetch_optional(ex)
        .await
}

pub async fn insert(ex: impl PgExecutor<'_>, movie: &NewMovie) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO movies (title, runtime_seconds, description, genre, poster_url, release_date)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(&movie.title)
    .bind(movie.runtime_seconds)
    .bind(&movie.description)
    .bind(&movie.genre)
    .bind(&movie.poster_url)
    .bind(movie.release_date)
    .fetch_one(ex)
    .await
}

pub async fn list(ex: impl PgExecutor<'_>) -> sqlx::Result<Vec<Movie>> {
    sqlx::query_as::<_, Movie>(
        "SELECT id, title, runtime_seconds, description, genre, poster_url, release_date, created_at
         FROM movies
         ORDER BY id",
    )
    .fetch_all(ex)
    .await
}
