pub mod rooms;
pub mod movies;
pub mod showtimes;
pub mod reservations;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(rooms::routes())
        .merge(movies::routes())
        .merge(showtimes::routes())
        .merge(reservations::routes())
}
