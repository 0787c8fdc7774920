//! Error types for the library API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// A book with the same isbn already exists
    #[error("Isbn already registered")]
    DuplicateIsbn,

    /// The referenced book has an unreturned loan
    #[error("Book already loaned")]
    BookAlreadyLoaned,

    /// Precondition failure on the caller's side (e.g. mutating an
    /// entity that was never persisted)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// One entry per invalid request field
    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body: an ordered list of human-readable messages
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, errors) = match self {
            AppError::DuplicateIsbn | AppError::BookAlreadyLoaned => {
                (StatusCode::BAD_REQUEST, vec![self.to_string()])
            }
            AppError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, vec![msg]),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, vec![msg]),
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, errors),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, vec![msg]),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec!["Database error".to_string()],
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec!["Internal server error".to_string()],
                )
            }
        };

        (status, Json(ErrorResponse { errors })).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_errors(err: AppError) -> (StatusCode, Vec<String>) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let errors = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect();
        (status, errors)
    }

    #[tokio::test]
    async fn duplicate_isbn_maps_to_bad_request() {
        let (status, errors) = body_errors(AppError::DuplicateIsbn).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(errors, vec!["Isbn already registered"]);
    }

    #[tokio::test]
    async fn book_already_loaned_maps_to_bad_request() {
        let (status, errors) = body_errors(AppError::BookAlreadyLoaned).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(errors, vec!["Book already loaned"]);
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let (status, errors) = body_errors(AppError::NotFound("Book with id 1 not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(errors, vec!["Book with id 1 not found"]);
    }

    #[tokio::test]
    async fn validation_keeps_one_entry_per_field() {
        let errors = vec![
            "author must not be empty".to_string(),
            "isbn must not be empty".to_string(),
            "title must not be empty".to_string(),
        ];
        let (status, body) = body_errors(AppError::Validation(errors.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, errors);
    }

    #[tokio::test]
    async fn database_error_body_is_generic() {
        let (status, errors) = body_errors(AppError::Database(sqlx::Error::PoolClosed)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(errors, vec!["Database error"]);
    }
}
