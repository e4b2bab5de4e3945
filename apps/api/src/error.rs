//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Gateway                            │
//! │                                                                         │
//! │  Handler: Result<ApiResponse<T>, ApiError>                             │
//! │         │                                                               │
//! │         ├── JSON / query rejection ──────────┐                         │
//! │         ├── DbError::Domain (validation) ────┤                         │
//! │         ├── DbError::*Violation ─────────────┼──► 400 "validation"      │
//! │         ├── DbError::NotFound ───────────────┼──► 404 "not_found"       │
//! │         └── anything else ───────────────────┴──► 500 "server" (logged) │
//! │                                                  message passed through │
//! │                                                                         │
//! │  Body: { "success": false, "error": "...", "error_type": "..." }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use matreg_core::ValidationError;
use matreg_db::DbError;

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "success": false,
///   "error": "Material with ID 42 not found",
///   "error_type": "not_found"
/// }
/// ```
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// Machine-readable category, also decides the status code
    pub kind: ErrorKind,

    /// Human-readable error message for display
    pub message: String,
}

/// Error categories as they appear in `error_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input (400)
    Validation,

    /// Missing resource (404)
    NotFound,

    /// Everything else (500)
    Server,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Server => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ApiError {
            kind,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(entity: &str, id: &str) -> Self {
        ApiError::new(
            ErrorKind::NotFound,
            format!("{} with ID {} not found", entity, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorKind::Validation, message)
    }

    /// Creates a server error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorKind::Server, message)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
    error_type: ErrorKind,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: &self.message,
            error_type: self.kind,
        };

        (self.kind.status(), Json(body)).into_response()
    }
}

/// Converts registry errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::Domain(e) => ApiError::validation(e.to_string()),
            DbError::UniqueViolation { field, value } => {
                ApiError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::validation("Invalid supplier reference")
            }
            DbError::CheckViolation { message } => {
                tracing::warn!("Check constraint violation: {}", message);
                ApiError::validation("Invalid field value")
            }
            err @ (DbError::ConnectionFailed(_)
            | DbError::MigrationFailed(_)
            | DbError::QueryFailed(_)
            | DbError::PoolExhausted
            | DbError::Internal(_)) => {
                tracing::error!(error = %err, "Registry operation failed");
                ApiError::internal(err.to_string())
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}
