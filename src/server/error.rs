//! HTTP error responses
//!
//! Every error leaves the service as a JSON `{"message": ...}` body.

use crate::domain::{DeidError, EngineError};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

/// Errors returned by request handlers
#[derive(Debug)]
pub enum ApiError {
    /// Malformed JSON or a missing required key
    BadRequest(String),
    /// Bulk request above the configured limit
    PayloadTooLarge(String),
    /// Engine or runtime failure
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(self) -> String {
        match self {
            Self::BadRequest(m) | Self::PayloadTooLarge(m) | Self::Internal(m) => m,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = ?self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = ?self, "Request rejected");
        }

        (status, Json(ErrorBody { message: self.message() })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<DeidError> for ApiError {
    fn from(err: DeidError) -> Self {
        match err {
            DeidError::Engine(EngineError::InvalidInput(message)) => Self::BadRequest(message),
            other => Self::Internal(other.to_string()),
        }
    }
}
