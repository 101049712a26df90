use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::ReconcileError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl ApiError {
    /// Error returned by every directory endpoint while the integration is switched off.
    pub fn ldap_disabled() -> Self {
        ApiError::BadRequest("LDAP is not enabled".into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::warn!("Upstream unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    msg.clone(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ReconcileError> for ApiError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::Configuration(msg) => ApiError::BadRequest(msg),
            ReconcileError::Validation(msg) => ApiError::Validation(msg),
            ReconcileError::RefusedSuperAdmin(_) => ApiError::BadRequest(err.to_string()),
            ReconcileError::UserNotFound(_) => ApiError::NotFound("User not found".into()),
            ReconcileError::DirectoryUserNotFound(_) => {
                ApiError::NotFound("No user was found on the LDAP server(s)".into())
            }
            ReconcileError::OrganizationNotFound(_) => ApiError::NotFound(err.to_string()),
            ReconcileError::Upstream(msg) => ApiError::ServiceUnavailable(msg),
            ReconcileError::Store(msg) => ApiError::Internal(msg),
        }
    }
}
