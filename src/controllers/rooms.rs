use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::catalog;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/rooms", get(list_rooms).post(create_room))
}

#[derive(Debug, Deserialize, Validate)]
struct CreateRoomRequest {
    #[validate(length(min = 1, max = 255))]
    name: String,
    #[validate(range(min = 1))]
    capacity: i32,
}

#[derive(Debug, Serialize)]
struct CreatedResponse {
    id: i64,
}

// POST /api/rooms (admin)
async fn create_room(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(|e| ApiError::BadParam(e.to_string()))?;

    let id = catalog::create_room(&state.db.pool, user.role, &req.name, req.capacity).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

// GET /api/rooms
async fn list_rooms(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let rooms = catalog::list_rooms(&state.db.pool).await?;
    Ok(Json(rooms))
}
