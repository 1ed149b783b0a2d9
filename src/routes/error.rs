use crate::service::ServiceError;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// The sole translation point between core errors and transport status
/// codes. Storage failures are logged here and never leak their details
/// into response bodies.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("subscription not found")]
    NotFound,
    #[error("subscription already exists")]
    AlreadyExists,
    #[error("operation timed out")]
    Timeout,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::InvalidDateRange | ServiceError::InvalidRange => {
                ApiError::Validation(e.to_string())
            }
            ServiceError::Store(StoreError::AlreadyExists) => ApiError::AlreadyExists,
            ServiceError::Store(StoreError::NotFound) => ApiError::NotFound,
            ServiceError::Store(StoreError::Database(e)) => ApiError::Internal(e.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::AlreadyExists => (StatusCode::CONFLICT, self.to_string()),
            ApiError::Timeout | ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        match &self {
            ApiError::Timeout | ApiError::Internal(_) => tracing::error!("{self:?}"),
            _ => tracing::warn!("{self:?}"),
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
