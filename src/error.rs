use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Error taxonomy for every operation the service exposes. Business-rule
// violations are Conflict, client input problems are BadParam, storage
// failures collapse into Server and never leak their internal text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    BadParam(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal server error")]
    Server(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::BadParam(_) => "BAD_PARAM",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Server(_) => "SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadParam(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Server(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Server(ref e) = self {
            tracing::error!("internal error: {:?}", e);
        }
        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}

// True when `err` is a violation of the named constraint. Lets callers
// translate a lost insert race into the same Conflict the pre-check
// would have produced.
pub fn violates_constraint(err: &sqlx::Error, name: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => db.constraint() == Some(name),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(ApiError::Unauthorized("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::BadParam("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Server(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn server_error_never_leaks_the_cause() {
        let err = ApiError::Server(anyhow::anyhow!("connection refused to db-internal-host"));
        assert_eq!(err.to_string(), "internal server error");
        assert_eq!(err.kind(), "SERVER_ERROR");
    }

    #[test]
    fn non_database_errors_never_match_a_constraint() {
        let err = sqlx::Error::RowNotFound;
        assert!(!violates_constraint(&err, "seats_showtime_seat_unique"));
    }
}
