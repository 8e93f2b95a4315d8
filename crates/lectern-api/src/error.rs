//! API error types and JSON error response formatting.
//!
//! ApiError maps pipeline failures to HTTP status codes. Extraction failures
//! keep the ingestion endpoint's `{success, message}` envelope; everything
//! else uses a consistent JSON error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use lectern_core::error::LecternError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "bad_gateway").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// Ingestion endpoint envelope, also used for its failure responses.
#[derive(Debug, Serialize)]
pub struct IngestEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid request body.
    BadRequest(String),
    /// 400 Bad Request - required scraped field missing; ingestion envelope.
    ExtractionFailed(String),
    /// 502 Bad Gateway - an external service call failed.
    BadGateway(String),
    /// 500 Internal Server Error - unexpected server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: "bad_request".to_string(),
                    message: msg,
                }),
            )
                .into_response(),
            ApiError::ExtractionFailed(msg) => (
                StatusCode::BAD_REQUEST,
                Json(IngestEnvelope {
                    success: false,
                    message: Some(msg),
                }),
            )
                .into_response(),
            ApiError::BadGateway(msg) => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorBody {
                    error: "bad_gateway".to_string(),
                    message: msg,
                }),
            )
                .into_response(),
            // Do not leak internal details to clients.
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: "internal_error".to_string(),
                        message: "An internal error occurred".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl From<LecternError> for ApiError {
    fn from(err: LecternError) -> Self {
        match err {
            LecternError::MalformedInput(msg) => ApiError::BadRequest(msg),
            LecternError::Extraction(msg) => ApiError::ExtractionFailed(msg),
            ref e if e.is_upstream() => ApiError::BadGateway(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
