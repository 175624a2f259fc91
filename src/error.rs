//! Error types for the PDF Share server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("File too large (max {max} bytes)")]
    TooLarge { max: usize },

    #[error("{0}")]
    NotFound(String),

    #[error("Stored name already taken: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt file payload: {0}")]
    Payload(#[from] base64::DecodeError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::TooLarge { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Payload(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "Storage failure".to_string()
            }
            AppError::Payload(e) => {
                tracing::error!("Payload decode error: {}", e);
                "Stored file is corrupt".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_4xx() {
        assert_eq!(
            AppError::InvalidInput("Only PDF files are allowed".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::TooLarge { max: 10 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("File not found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_storage_failures_map_to_5xx() {
        let response = AppError::Database(sqlx::Error::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_too_large_message_names_limit() {
        let err = AppError::TooLarge { max: 10 * 1024 * 1024 };
        assert_eq!(err.to_string(), "File too large (max 10485760 bytes)");
    }
}
