//! Error handling - maps failures to `{"detail": ...}` bodies.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use blog_core::error::{DomainError, ValidationErrors};
use blog_shared::ErrorResponse;
use std::fmt;

/// Application-level error type rendered as a JSON response.
#[derive(Debug)]
pub enum AppError {
    /// Missing and hidden resources alike.
    NotFound,
    /// Field errors, rendered as `{"field": ["message", ...]}`.
    Validation(ValidationErrors),
    BadRequest(String),
    Conflict(String),
    TooManyRequests { retry_after_secs: u64 },
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound => write!(f, "Not found"),
            AppError::Validation(errors) => write!(f, "Validation errors: {}", errors),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::TooManyRequests { retry_after_secs } => {
                write!(f, "Too many requests, retry after {}s", retry_after_secs)
            }
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());

        match self {
            AppError::NotFound => builder.json(ErrorResponse::not_found()),
            AppError::Validation(errors) => builder.json(errors),
            AppError::BadRequest(detail) => builder.json(ErrorResponse::bad_request(detail)),
            AppError::Conflict(detail) => builder.json(ErrorResponse::new(detail)),
            AppError::TooManyRequests { retry_after_secs } => builder
                .insert_header(("Retry-After", retry_after_secs.to_string()))
                .json(ErrorResponse::too_many_requests(*retry_after_secs)),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                builder.json(ErrorResponse::internal_error())
            }
        }
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound => AppError::NotFound,
            DomainError::Validation(errors) => AppError::Validation(errors),
            DomainError::Integrity(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
