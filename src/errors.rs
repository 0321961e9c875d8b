use std::time::Duration;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::dto::ErrorResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration Error: {0}")]
    Config(String),

    /// Zero rows matched. Not a system failure.
    #[error("no rows in result set")]
    NotFound,

    /// Client-caused: bad content type, malformed JSON, invalid fields or path id.
    #[error("{0}")]
    Validation(String),

    /// Request body exceeded the router's body limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("context deadline exceeded after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database(_)
            | AppError::Migrate(_)
            | AppError::Config(_)
            | AppError::Timeout(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_by_kind() {
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Validation("Title is required;".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::PayloadTooLarge("length limit exceeded".into()).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::Timeout(Duration::from_secs(5)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_are_not_decorated() {
        assert_eq!(AppError::NotFound.to_string(), "no rows in result set");
        assert_eq!(
            AppError::Timeout(Duration::from_secs(5)).to_string(),
            "context deadline exceeded after 5s"
        );
        assert_eq!(AppError::Validation("boom".into()).to_string(), "boom");
    }
}
