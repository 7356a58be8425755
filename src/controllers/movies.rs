use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::NewMovie;
use crate::services::catalog;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/movies", get(list_movies).post(create_movie))
}

#[derive(Debug, Deserialize, Validate)]
struct CreateMovieRequest {
    #[validate(length(min = 1, max = 255))]
    title: String,
    #[validate(range(min = 1))]
    runtime_seconds: i32,
    description: Option<String>,
    genre: Option<String>,
    poster_url: Option<String>,
    release_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct CreatedResponse {
    id: i64,
}

// POST /api/movies (admin)
async fn create_movie(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateMovieRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(|e| ApiError::BadParam(e.to_string()))?;

    let movie = NewMovie {
        title: req.title,
        runtime_seconds: req.runtime_seconds,
        description: req.description,
        genre: req.genre,
        poster_url: req.poster_url,
        release_date: req.release_date,
    };
    let id = catalog::create_movie(&state.db.pool, user.role, movie).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

// GET /api/movies
async fn list_movies(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let movies = catalog::list_movies(&state.db.pool).await?;
    Ok(Json(movies))
}
