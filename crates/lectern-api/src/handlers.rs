//! Route handler functions for the ingestion, query, and health endpoints.

use axum::body::Body;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use lectern_core::types::ConversationMessage;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request/response types
// =============================================================================

/// Request body for POST /api/submit-link.
#[derive(Debug, Deserialize)]
pub struct SubmitLinkRequest {
    /// URL of the professor-review page to ingest.
    pub link: String,
}

/// Response body for POST /api/submit-link.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitLinkResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

// =============================================================================
// Handler functions
// =============================================================================

/// POST /api/submit-link - scrape a review page and upsert the professor.
pub async fn submit_link(
    State(state): State<AppState>,
    Json(body): Json<SubmitLinkRequest>,
) -> Result<Json<SubmitLinkResponse>, ApiError> {
    match state.ingest.ingest(&body.link).await {
        Ok(record) => {
            tracing::info!(id = %record.id, "Submit-link succeeded");
            Ok(Json(SubmitLinkResponse {
                success: true,
                message: None,
            }))
        }
        Err(e) => Err(ApiError::from(e)),
    }
}

/// POST /api/chat - stream a retrieval-augmented recommendation.
///
/// The response body is raw text fragments in model emission order; a
/// mid-stream upstream failure terminates the body through the transport
/// with no in-band error payload.
pub async fn chat(
    State(state): State<AppState>,
    Json(messages): Json<Vec<ConversationMessage>>,
) -> Result<Response, ApiError> {
    let stream = state.query.respond(&messages).await.map_err(ApiError::from)?;

    Ok(Body::from_stream(stream).into_response())
}

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
