use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::scheduler;
use crate::store::{seats, showtimes};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/showtimes", get(list_showtimes).post(create_showtime))
        .route(
            "/showtimes/{id}",
            get(get_showtime)
                .put(edit_showtime)
                .delete(delete_showtime),
        )
        .route("/showtimes/{id}/seats", get(list_occupied_seats))
}

// Shared by create and edit; the end is always derived server-side
#[derive(Debug, Deserialize, Validate)]
struct ShowtimeRequest {
    #[validate(range(min = 1))]
    movie_id: i64,
    #[validate(range(min = 1))]
    room_id: i64,
    starts_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct CreatedResponse {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct ShowtimesQuery {
    room_id: Option<i64>,
}

// POST /api/showtimes (admin)
async fn create_showtime(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<ShowtimeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(|e| ApiError::BadParam(e.to_string()))?;

    let id = scheduler::create_showtime(
        &state.db.pool,
        user.role,
        req.movie_id,
        req.room_id,
        req.starts_at,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

// PUT /api/showtimes/{id} (admin)
async fn edit_showtime(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<ShowtimeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(|e| ApiError::BadParam(e.to_string()))?;

    scheduler::edit_showtime(
        &state.db.pool,
        user.role,
        id,
        req.movie_id,
        req.room_id,
        req.starts_at,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/showtimes/{id} (admin)
async fn delete_showtime(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    scheduler::delete_showtime(&state.db.pool, user.role, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/showtimes?room_id=
async fn list_showtimes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShowtimesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = showtimes::list(&state.db.pool, params.room_id).await?;
    Ok(Json(items))
}

// GET /api/showtimes/{id}
async fn get_showtime(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let showtime = showtimes::get(&state.db.pool, id)
        .await?
        .ok_or_else(|| ApiError::Conflict("showtime does not exist".to_string()))?;
    Ok(Json(showtime))
}

// GET /api/showtimes/{id}/seats - occupied seats only
async fn list_occupied_seats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let occupied = seats::list_for_showtime(&state.db.pool, id).await?;
    Ok(Json(occupied))
}
