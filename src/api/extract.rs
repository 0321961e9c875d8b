use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{StatusCode, header::CONTENT_TYPE, request::Parts},
};
use serde::de::DeserializeOwned;

use crate::api::dto::ValidatedRequest;
use crate::errors::AppError;

/// Rejects the request unless `Content-Type` is exactly `application/json`.
///
/// Runs before any other extractor on write routes, so the body is never read
/// for a wrong content type.
pub struct JsonContentType;

impl<S> FromRequestParts<S> for JsonContentType
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.headers.get(CONTENT_TYPE) {
            Some(value) if value.as_bytes() == mime::APPLICATION_JSON.essence_str().as_bytes() => {
                Ok(Self)
            }
            _ => Err(AppError::Validation(
                "content-type is not application/json".to_string(),
            )),
        }
    }
}

/// The `{id}` path segment parsed as an integer.
#[derive(Debug, Clone, Copy)]
pub struct TaskId(pub i64);

impl<S> FromRequestParts<S> for TaskId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        raw.parse::<i64>()
            .map(TaskId)
            .map_err(|e| AppError::Validation(format!("parsing {:?}: {}", raw, e)))
    }
}

/// JSON body decoded into a wire shape, validated, and converted to its transfer type.
pub struct ValidJson<T: ValidatedRequest>(pub T::Transfer);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + ValidatedRequest,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge(e.body_text())
            } else {
                tracing::error!(error = %e.body_text(), "Failed to read request body");
                AppError::Internal(e.body_text())
            }
        })?;

        let wire: T =
            serde_json::from_slice(&body).map_err(|e| AppError::Validation(e.to_string()))?;

        wire.into_transfer().map(ValidJson)
    }
}
