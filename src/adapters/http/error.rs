//! HTTP error responses.
//!
//! Every JSON endpoint reports failures as `{"error": "<message>"}`. Server
//! errors are logged here and answered with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::application::handlers::{ApiTokenError, CheckoutError, LoginError};
use crate::domain::billing::WebhookError;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Error body shared by all JSON endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// An error that renders as a status code plus `{error}` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Conversions
// ════════════════════════════════════════════════════════════════════════════════

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        ApiError::new(err.status_code(), err.public_message())
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        if err.is_client_error() {
            return ApiError::bad_request(err.to_string());
        }
        tracing::error!(error = ?err, "Checkout session creation failed");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

impl From<LoginError> for ApiError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::MissingCredentials => ApiError::bad_request(err.to_string()),
            LoginError::InvalidCredentials => ApiError::unauthorized(err.to_string()),
            LoginError::Internal(detail) => {
                tracing::error!(error = %detail, "Login failed");
                ApiError::internal()
            }
        }
    }
}

impl From<ApiTokenError> for ApiError {
    fn from(err: ApiTokenError) -> Self {
        match err {
            ApiTokenError::Validation(message) => ApiError::bad_request(message),
            ApiTokenError::InvalidCredentials => ApiError::unauthorized(err.to_string()),
            ApiTokenError::Internal(detail) => {
                tracing::error!(error = %detail, "API token issuance failed");
                ApiError::internal()
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => ApiError::bad_request(err.message),
            ErrorCode::Unauthorized => ApiError::unauthorized(err.message),
            _ => {
                tracing::error!(error = %err, "Request failed");
                ApiError::internal()
            }
        }
    }
}
