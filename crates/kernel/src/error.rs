//! Application error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::storage::StoreError;

/// A validation failure on one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid data")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    Conflict(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [FieldError]>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        };

        // Server-side failures are logged in full and reported vaguely
        let error = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = ?e, "internal server error");
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let details = match &self {
            AppError::Validation(fields) => Some(fields.as_slice()),
            _ => None,
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(message) => AppError::Conflict(message),
            StoreError::Other(e) => AppError::Internal(e),
        }
    }
}

impl From<Vec<FieldError>> for AppError {
    fn from(fields: Vec<FieldError>) -> Self {
        AppError::Validation(fields)
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_lists_field_details() {
        let (status, json) = body_json(AppError::Validation(vec![FieldError::new(
            "startDate",
            "must be an RFC 3339 date-time",
        )]))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid data");
        assert_eq!(json["details"][0]["field"], "startDate");
    }

    #[tokio::test]
    async fn not_found_has_no_details() {
        let (status, json) = body_json(AppError::NotFound("Category not found")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Category not found");
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn internal_errors_are_vague() {
        let (status, json) =
            body_json(AppError::Internal(anyhow::anyhow!("pool exhausted at 10.0.0.3"))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "internal server error");
    }

    #[tokio::test]
    async fn store_database_failure_is_internal() {
        let e: AppError = StoreError::from(anyhow::Error::new(sqlx::Error::PoolTimedOut)).into();
        assert!(matches!(e, AppError::Internal(_)));

        let (status, json) = body_json(e).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "internal server error");
    }

    #[test]
    fn store_conflict_maps_to_conflict() {
        let e: AppError = StoreError::Conflict("Convention with this slug already exists".into()).into();
        assert!(matches!(e, AppError::Conflict(_)));
    }
}
