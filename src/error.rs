//! Error types for the catalog service

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error kinds carried in the `error` field of the error envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadRequest,
    ValidationError,
    NotFound,
    ServerError,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorKind,
    pub message: String,
}

impl ErrorResponse {
    pub fn server_error() -> Self {
        Self {
            error: ErrorKind::ServerError,
            message: "Internal server error".to_string(),
        }
    }
}

impl AppError {
    pub fn book_not_found() -> Self {
        AppError::NotFound("Book not found".to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::BadRequest(_) | AppError::MethodNotAllowed => ErrorKind::BadRequest,
            AppError::Validation(_) => ErrorKind::ValidationError,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Database(_) | AppError::Internal(_) => ErrorKind::ServerError,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.kind();
        let body = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ErrorResponse::server_error()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorResponse::server_error()
            }
            AppError::MethodNotAllowed => ErrorResponse {
                error,
                message: "Method not allowed".to_string(),
            },
            AppError::BadRequest(message)
            | AppError::Validation(message)
            | AppError::NotFound(message) => ErrorResponse { error, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {}", rejection.body_text());
        AppError::BadRequest("JSON body required".to_string())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected path: {}", rejection.body_text());
        AppError::NotFound("Resource not found".to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
