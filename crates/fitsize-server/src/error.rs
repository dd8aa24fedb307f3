//! JSON error responses for the HTTP API.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fitsize_core::CompressError;
use serde_json::json;

/// API error with status code and message.
///
/// Serialized as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub const INTERNAL_MESSAGE: &'static str = "An unexpected error occurred";

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: msg.into() }
    }

    pub fn too_large(limit_bytes: usize) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: CompressError::TooLarge { limit_bytes }.to_string(),
        }
    }

    /// Details stay in the log, never in the response.
    pub fn internal() -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: Self::INTERNAL_MESSAGE.to_string() }
    }

    /// Map a failure while reading the multipart body.
    pub fn from_multipart(err: MultipartError, limit_bytes: usize) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::too_large(limit_bytes)
        } else {
            Self::bad_request(err.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<CompressError> for ApiError {
    fn from(err: CompressError) -> Self {
        match err {
            CompressError::TooLarge { limit_bytes } => ApiError::too_large(limit_bytes),
            CompressError::EncodingFailed { .. } => ApiError::internal(),
            other => ApiError::bad_request(other.to_string()),
        }
    }
}
