use crate::domain::payment::{ErrorEnvelope, ErrorPayload};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

/// Engine error taxonomy. Validation and eligibility errors are resolved
/// locally and never retried; `ExternalDependency` is the only retryable
/// kind. No error path commits partial state.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("ineligible: {0}")]
    Ineligible(String),

    #[error("attendance not verified")]
    AttendanceNotVerified,

    #[error("certificate already issued")]
    AlreadyIssued,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("external dependency: {0}")]
    ExternalDependency(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl EngineError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
            EngineError::Ineligible(_)
            | EngineError::AttendanceNotVerified
            | EngineError::AlreadyIssued => StatusCode::BAD_REQUEST,
            EngineError::Conflict(_) => StatusCode::CONFLICT,
            EngineError::ExternalDependency(_) => StatusCode::BAD_GATEWAY,
            EngineError::Database(_) | EngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "VALIDATION_ERROR",
            EngineError::NotFound(_) => "NOT_FOUND",
            EngineError::Ineligible(_) => "INELIGIBLE",
            EngineError::AttendanceNotVerified => "ATTENDANCE_NOT_VERIFIED",
            EngineError::AlreadyIssued => "CERTIFICATE_ALREADY_ISSUED",
            EngineError::Conflict(_) => "CONFLICT",
            EngineError::ExternalDependency(_) => "EXTERNAL_DEPENDENCY_ERROR",
            EngineError::Database(_) => "DATABASE_ERROR",
            EngineError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Internal details stay in the logs, not the response body.
        let message = match &self {
            EngineError::Database(e) => {
                error!(error = ?e, "database error");
                "a database error occurred".to_string()
            }
            EngineError::Internal(e) => {
                error!(error = ?e, "internal error");
                "an internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorEnvelope {
            error: ErrorPayload {
                code: code.to_string(),
                message,
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
