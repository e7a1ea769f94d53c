//! Error types for the library server

use std::fmt::Display;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Build a not-found error of the form `<resource> not found with <field> : '<value>'`
    pub fn not_found(resource: &str, field: &str, value: impl Display) -> Self {
        AppError::NotFound(format!("{} not found with {} : '{}'", resource, field, value))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Description of the failure
    pub message: String,
    /// Request context, e.g. `uri=/v1/books/42`
    pub details: String,
}

/// Marker left on error responses so the request-details middleware can rebuild the body.
#[derive(Debug, Clone)]
pub struct ErrorMessage(pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match &self {
            AppError::Database(e) => tracing::error!("Database error: {:?}", e),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            _ => tracing::debug!(status = %status, "Request failed: {}", message),
        }

        let body = Json(ErrorResponse {
            message: message.clone(),
            details: String::new(),
        });

        let mut response = (status, body).into_response();
        response.extensions_mut().insert(ErrorMessage(message));
        response
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
