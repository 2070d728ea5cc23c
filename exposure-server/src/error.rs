//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;
use thiserror::Error;

use callbreach_core::logic::capture::CaptureError;
use callbreach_core::logic::session::SessionError;
use callbreach_core::{ExposureError, PolicyError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    // Resource errors
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Gone(String),

    // Validation errors
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    PayloadTooLarge(String),

    // Capacity
    #[error("{0}")]
    ServiceUnavailable(String),

    // Generic errors
    #[error("{0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.as_str()),
            AppError::Gone(msg) => (StatusCode::GONE, msg.as_str()),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.as_str()),
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Rejecting request: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg.as_str())
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ExposureError> for AppError {
    fn from(err: ExposureError) -> Self {
        match err {
            ExposureError::MalformedInput(_) => AppError::ValidationError(err.to_string()),
            ExposureError::CapacityExceeded { .. } => AppError::PayloadTooLarge(err.to_string()),
        }
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::Cancelled => AppError::Gone("Scan was abandoned".to_string()),
            CaptureError::AlreadyClosed => AppError::Conflict("Capture window already closed".to_string()),
            CaptureError::Source(msg) => AppError::InternalError(msg),
            CaptureError::Input(e) => e.into(),
        }
    }
}

impl From<PolicyError> for AppError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::UnknownDataset(key) => AppError::NotFound(format!("Unknown dataset: {}", key)),
            PolicyError::Io { .. } => AppError::InternalError(err.to_string()),
            other => AppError::ValidationError(other.to_string()),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Capture(e) => e.into(),
            SessionError::Input(e) => e.into(),
            SessionError::Policy(e) => e.into(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: AppError = ExposureError::CapacityExceeded { what: "candidate", limit: 4 }.into();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));

        let err: AppError = CaptureError::Cancelled.into();
        assert_eq!(err.into_response().status(), StatusCode::GONE);

        let err: AppError = PolicyError::UnknownDataset("x".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err: AppError = SessionError::Capture(CaptureError::AlreadyClosed).into();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
