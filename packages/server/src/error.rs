use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::storage::StorageError;
use domain::{DomainError, Violations};
use serde::Serialize;

/// One rejected input field.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ViolationBody {
    /// Name of the offending field.
    #[schema(example = "table_number")]
    pub field: &'static str,
    #[schema(example = "table number is required")]
    pub message: String,
}

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `PERMISSION_DENIED`, `NOT_FOUND`,
    /// `SUBMISSION_IN_FLIGHT`, `ALREADY_SUBMITTED`, `PERSISTENCE_FAILED`,
    /// `QUERY_FAILED`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "table number is required")]
    pub message: String,
    /// Every violated field, present for `VALIDATION_ERROR` raised by the catalog or order rules.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ViolationBody>,
    /// Whether repeating the same request may succeed.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

impl ErrorBody {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            violations: Vec::new(),
            retryable: false,
        }
    }

    fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    Violations(Violations),
    TokenMissing,
    TokenInvalid,
    PermissionDenied,
    NotFound(String),
    SubmissionInFlight,
    AlreadySubmitted(uuid::Uuid),
    PersistenceFailed(String),
    QueryFailed(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("VALIDATION_ERROR", msg),
            ),
            AppError::Violations(violations) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message: violations.to_string(),
                    violations: violations
                        .iter()
                        .map(|v| ViolationBody {
                            field: v.field(),
                            message: v.to_string(),
                        })
                        .collect(),
                    ..ErrorBody::new("VALIDATION_ERROR", "")
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("TOKEN_MISSING", "Authentication required"),
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("TOKEN_INVALID", "Invalid or expired token"),
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody::new("PERMISSION_DENIED", "Insufficient permissions"),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new("NOT_FOUND", msg)),
            AppError::SubmissionInFlight => (
                StatusCode::CONFLICT,
                ErrorBody::new(
                    "SUBMISSION_IN_FLIGHT",
                    "This order is already being submitted",
                ),
            ),
            AppError::AlreadySubmitted(id) => (
                StatusCode::CONFLICT,
                ErrorBody::new(
                    "ALREADY_SUBMITTED",
                    format!("This order was already submitted as {id}"),
                ),
            ),
            AppError::PersistenceFailed(detail) => {
                tracing::warn!("Persistence failed: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorBody::new("PERSISTENCE_FAILED", "Could not save changes, try again")
                        .retryable(),
                )
            }
            AppError::QueryFailed(detail) => {
                tracing::warn!("Catalog query failed: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorBody::new("QUERY_FAILED", "Could not load the catalog, try again")
                        .retryable(),
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("INTERNAL_ERROR", "An unexpected error occurred"),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(violations) => AppError::Violations(violations),
            DomainError::Unauthorized => AppError::PermissionDenied,
            DomainError::NotFound(what) => AppError::NotFound(format!("{what} not found")),
            DomainError::Persistence(detail) => AppError::PersistenceFailed(detail),
            DomainError::QueryFailed(detail) => AppError::QueryFailed(detail),
            DomainError::SubmissionInFlight => AppError::SubmissionInFlight,
            DomainError::AlreadySubmitted(id) => AppError::AlreadySubmitted(id),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(path) => AppError::NotFound(format!("Asset '{path}' not found")),
            StorageError::InvalidPath(msg) => AppError::Validation(msg),
            StorageError::SizeLimitExceeded { actual, limit } => AppError::Validation(format!(
                "Image exceeds maximum size of {limit} bytes ({actual} bytes)"
            )),
            other => AppError::Internal(other.to_string()),
        }
    }
}
