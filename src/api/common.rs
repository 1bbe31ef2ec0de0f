use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::error::ErrorKind;
use thiserror::Error;
use tracing::error;
use validator::Validate;

/// Error taxonomy shared by every resource handler.
///
/// Persistence failures are translated to the nearest client-facing
/// variant; anything unexpected stays in `Database` and is reported to
/// the client without internal detail.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    UnprocessableEntity(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Database(e) => {
                error!("Unexpected database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err.as_database_error().map(|e| e.kind()) {
            Some(ErrorKind::UniqueViolation) => {
                ApiError::Conflict("record already exists".to_string())
            }
            Some(ErrorKind::ForeignKeyViolation) => {
                ApiError::UnprocessableEntity("referenced record does not exist".to_string())
            }
            Some(ErrorKind::CheckViolation) | Some(ErrorKind::NotNullViolation) => {
                ApiError::BadRequest("value rejected by a database constraint".to_string())
            }
            _ => ApiError::Database(err),
        }
    }
}

/// True when the error is a unique-constraint violation. Handlers use
/// this to attach an entity-specific conflict message before falling
/// back to the generic translation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error().map(|e| e.kind()),
        Some(ErrorKind::UniqueViolation)
    )
}

/// True when the error is a foreign-key violation.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error().map(|e| e.kind()),
        Some(ErrorKind::ForeignKeyViolation)
    )
}

/// Runs the derived payload validation and maps failures to 400.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Acknowledgment body for delete and associate operations.
#[derive(Debug, Serialize)]
pub struct StatusAck {
    pub status: &'static str,
}

impl StatusAck {
    pub fn deleted() -> Self {
        Self { status: "deleted" }
    }

    pub fn associated() -> Self {
        Self { status: "associated" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_not_found_response() {
        let error = ApiError::NotFound("company 'nope' not found".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_response() {
        let error = ApiError::Conflict("company code 'apple' already exists".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_unprocessable_entity_response() {
        let error = ApiError::UnprocessableEntity("company 'nope' does not exist".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_bad_request_response() {
        let error = ApiError::BadRequest("name is required".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_database_error_hides_detail() {
        let error = ApiError::Database(sqlx::Error::PoolClosed);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_pool_errors_stay_internal() {
        let translated = ApiError::from(sqlx::Error::PoolClosed);
        assert!(matches!(translated, ApiError::Database(_)));
    }

    #[test]
    fn test_status_ack_bodies() {
        let deleted = serde_json::to_value(StatusAck::deleted()).unwrap();
        assert_eq!(deleted, serde_json::json!({ "status": "deleted" }));

        let associated = serde_json::to_value(StatusAck::associated()).unwrap();
        assert_eq!(associated, serde_json::json!({ "status": "associated" }));
    }
}
