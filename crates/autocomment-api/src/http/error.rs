//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

use autocomment_types::error::{
    AllocationError, RepositoryError, SessionError, SubmitError,
};

use crate::http::response::{ApiErrorDetail, ApiResponse};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// A refused allocation, editor or gate operation.
    Allocation(AllocationError),
    /// Submission rejected or not persisted.
    Submit(SubmitError),
    /// Opening a session failed.
    Session(SessionError),
    /// Storage failure outside a session.
    Repository(RepositoryError),
    /// No hosted session with this id for the caller.
    SessionNotFound(Uuid),
    /// Authentication failure.
    Unauthorized(String),
    /// Malformed request input.
    Validation(String),
}

impl From<AllocationError> for AppError {
    fn from(e: AllocationError) -> Self {
        AppError::Allocation(e)
    }
}

impl From<SubmitError> for AppError {
    fn from(e: SubmitError) -> Self {
        AppError::Submit(e)
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Allocation(e) => match e {
                AllocationError::InvalidLabel { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                AllocationError::LicenseRequired | AllocationError::LicenseUnavailable(_) => {
                    StatusCode::FORBIDDEN
                }
                AllocationError::TargetNotFound { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::CONFLICT,
            },
            AppError::Submit(SubmitError::Rejected(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Submit(SubmitError::Persistence(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Session(SessionError::Storage(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Session(SessionError::Corrupt(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Allocation(e) => e.code(),
            AppError::Submit(SubmitError::Rejected(_)) => "CONFIGURATION_INVALID",
            AppError::Submit(SubmitError::Persistence(_)) => "PERSISTENCE_FAILED",
            AppError::Session(SessionError::Storage(_)) => "PERSISTENCE_FAILED",
            AppError::Session(SessionError::Corrupt(_)) => "INTERNAL_ERROR",
            AppError::Repository(RepositoryError::NotFound) => "NOT_FOUND",
            AppError::Repository(RepositoryError::Conflict(_)) => "CONFLICT",
            AppError::Repository(_) => "INTERNAL_ERROR",
            AppError::SessionNotFound(_) => "SESSION_NOT_FOUND",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Validation(_) => "VALIDATION_ERROR",
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Allocation(e) => e.to_string(),
            AppError::Submit(e) => e.to_string(),
            AppError::Session(e) => e.to_string(),
            AppError::Repository(e) => e.to_string(),
            AppError::SessionNotFound(id) => format!("Session {id} not found"),
            AppError::Unauthorized(msg) | AppError::Validation(msg) => msg.clone(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::Allocation(AllocationError::CapacityExceeded {
                platform,
                metric,
                available,
                attempted,
                used,
                limit,
            }) => Some(json!({
                "platform": platform,
                "metric": metric,
                "available": available,
                "attempted": attempted,
                "used": used,
                "limit": limit,
            })),
            AppError::Allocation(e) => e.platform().map(|p| json!({ "platform": p })),
            AppError::Submit(SubmitError::Rejected(violations)) => Some(json!({
                "violations": violations
                    .iter()
                    .map(|v| json!({
                        "code": v.code(),
                        "platform": v.platform(),
                        "message": v.to_string(),
                        "violation": v,
                    }))
                    .collect::<Vec<_>>(),
            })),
            _ => None,
        }
    }

    pub fn detail(&self) -> ApiErrorDetail {
        ApiErrorDetail {
            code: self.code().to_string(),
            message: self.message(),
            details: self.details(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            tracing::error!(code = self.code(), "{}", self.message());
        }
        let body = ApiResponse::<()>::failure(vec![self.detail()], String::new(), 0);
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autocomment_types::budget::Metric;
    use autocomment_types::platform::Platform;
    use autocomment_types::violation::Violation;

    #[test]
    fn test_capacity_exceeded_maps_to_conflict_with_numbers() {
        let err = AppError::from(AllocationError::CapacityExceeded {
            platform: Platform::Linkedin,
            metric: Metric::Likes,
            available: 2,
            attempted: 5,
            used: 8,
            limit: 10,
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "CAPACITY_EXCEEDED");
        let details = err.detail().details.unwrap();
        assert_eq!(details["available"], 2);
        assert_eq!(details["platform"], "LINKEDIN");
    }

    #[test]
    fn test_license_errors_are_forbidden() {
        let err = AppError::from(AllocationError::LicenseRequired);
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.code(), "LICENSE_REQUIRED");

        let err = AppError::from(AllocationError::LicenseUnavailable("lic-1".into()));
        assert_eq!(err.code(), "LICENSE_REQUIRED");
    }

    #[test]
    fn test_rejected_submission_lists_every_violation() {
        let err = AppError::from(SubmitError::Rejected(vec![
            Violation::NoPlatformsEnabled,
            Violation::LicenseNotSelected,
        ]));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "CONFIGURATION_INVALID");
        let details = err.detail().details.unwrap();
        assert_eq!(details["violations"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_persistence_failure_is_retryable_status() {
        let err = AppError::from(SubmitError::Persistence("disk full".into()));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), "PERSISTENCE_FAILED");
    }

    #[test]
    fn test_session_not_found() {
        let err = AppError::SessionNotFound(Uuid::nil());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "SESSION_NOT_FOUND");
        assert!(err.detail().message.contains("not found"));
    }

    #[test]
    fn test_editor_errors_are_conflicts() {
        for e in [
            AllocationError::EditorBusy,
            AllocationError::EditorClosed,
            AllocationError::UnsavedChanges,
        ] {
            assert_eq!(AppError::from(e).status(), StatusCode::CONFLICT);
        }
    }
}
