//! Mapping of core failures onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use libchainsign::errors::Error as CoreError;
use serde::Serialize;
use thiserror::Error;

/// A failed request, rendered as `{"errors": [message]}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::UnsupportedAlgorithm(_) => Self::BadRequest(e.to_string()),
            CoreError::DeviceNotFound(_) => Self::NotFound(e.to_string()),
            CoreError::KeyGeneration(_)
            | CoreError::SignFailed(_)
            | CoreError::PublicKeyEncoding(_)
            | CoreError::InvalidChain(_) => Self::Internal(e.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    errors: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::warn!(%status, error = %self, "request rejected");
        }

        let body = ErrorBody {
            errors: vec![self.to_string()],
        };
        (status, Json(body)).into_response()
    }
}
