use sqlx::PgPool;

use crate::error::{violates_constraint, ApiError};
use crate::middleware::{require_role, Role};
use crate::models::{Movie, NewMovie, Room};
use crate::store::{movies, rooms};

pub async fn create_movie(pool: &PgPool, actor: Role, movie: NewMovie) -> Result<i64, ApiError> {
    require_role(actor, Role::Admin)?;

    let id = movies::insert(pool, &movie).await.map_err(|e| {
        if violates_constraint(&e, "movies_title_key") {
            ApiError::Conflict(format!("movie '{}' already exists", movie.title))
        } else {
            e.into()
        }
    })?;

    tracing::info!(movie_id = id, title = %movie.title, "movie created");
    Ok(id)
}

pub async fn list_movies(pool: &PgPool) -> Result<Vec<Movie>, ApiError> {
    Ok(movies::list(pool).await?)
}

pub async fn create_room(
    pool: &PgPool,
    actor: Role,
    name: &str,
    capacity: i32,
) -> Result<i64, ApiError> {
    require_role(actor, Role::Admin)?;

    let id = rooms::insert(pool, name, capacity).await.map_err(|e| {
        if violates_constraint(&e, "rooms_name_key") {
            ApiError::Conflict(format!("room '{name}' already exists"))
        } else {
            e.into()
        }
    })?;

    tracing::info!(room_id = id, name, capacity, "room created");
    Ok(id)
}

pub async fn list_rooms(pool: &PgPool) -> Result<Vec<Room>, ApiError> {
    Ok(rooms::list(pool).await?)
}
