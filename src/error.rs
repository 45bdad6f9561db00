use crate::clock::ClockError;
use crate::domain::DateError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    /// Server time could not be verified; dependent financial flows must
    /// abort rather than fall back to client time.
    #[error("Unable to verify server time, try again: {0}")]
    ClockUnavailable(String),
}

impl From<DateError> for AppError {
    fn from(err: DateError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ClockError> for AppError {
    fn from(err: ClockError) -> Self {
        AppError::ClockUnavailable(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ClockUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Unable to verify server time, try again: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
