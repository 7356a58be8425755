use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::reservations;
use crate::store::seats;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reservations", get(list_reservations).post(reserve_seat))
        .route("/reservations/{id}", axum::routing::delete(cancel_reservation))
        .route("/reservations/{id}/seat", patch(reassign_seat))
}

#[derive(Debug, Deserialize, Validate)]
struct ReserveSeatRequest {
    #[validate(range(min = 1))]
    showtime_id: i64,
    seat_number: i32,
}

#[derive(Debug, Deserialize)]
struct ReassignSeatRequest {
    seat_number: i32,
}

#[derive(Debug, Serialize)]
struct CreatedResponse {
    id: i64,
}

// POST /api/reservations
async fn reserve_seat(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<ReserveSeatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(|e| ApiError::BadParam(e.to_string()))?;

    let id = reservations::reserve_seat(
        &state.db.pool,
        user.role,
        user.user_id,
        req.showtime_id,
        req.seat_number,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

// DELETE /api/reservations/{id} (owner)
async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    reservations::cancel_reservation(&state.db.pool, user.role, user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PATCH /api/reservations/{id}/seat (owner)
async fn reassign_seat(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<ReassignSeatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    reservations::reassign_seat(&state.db.pool, user.role, user.user_id, id, req.seat_number)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/reservations - the caller's own reservations
async fn list_reservations(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let items = seats::list_for_user(&state.db.pool, user.user_id).await?;
    Ok(Json(items))
}
