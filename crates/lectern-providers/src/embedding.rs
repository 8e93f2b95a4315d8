//! Embedding service trait and implementations.
//!
//! - `OpenAiEmbedding` calls the OpenAI embeddings endpoint over HTTP. This
//!   is the production backend; the vector dimension is fixed by the model.
//! - `MockEmbedding` provides deterministic hash-based vectors for testing.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use lectern_core::error::LecternError;

/// Service for generating text embeddings.
///
/// Implementations convert text into fixed-dimensional vectors that capture
/// semantic meaning. Used for both ingestion (indexing) and query.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Generate an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LecternError>;

    /// Return the dimensionality of vectors produced by this service.
    fn dimensions(&self) -> usize;
}

// ---------------------------------------------------------------------------
// OpenAiEmbedding - OpenAI embeddings API over HTTP
// ---------------------------------------------------------------------------

const EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// OpenAI-backed embedding service.
#[derive(Debug, Clone)]
pub struct OpenAiEmbedding {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl OpenAiEmbedding {
    /// Create a client for the given model.
    ///
    /// The dimension is derived from the model name; the index must have been
    /// created with a matching dimension, which is trusted rather than checked.
    pub fn new(api_key: String, model: String) -> Result<Self, LecternError> {
        let dimensions = match model.as_str() {
            "text-embedding-3-large" => 3072,
            _ => 1536,
        };
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| LecternError::Embedding(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_key,
            model,
            dimensions,
        })
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    encoding_format: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingService for OpenAiEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LecternError> {
        if text.is_empty() {
            return Err(LecternError::Embedding(
                "cannot embed empty text".to_string(),
            ));
        }

        let body = EmbeddingRequest {
            model: &self.model,
            input: text,
            encoding_format: "float",
        };

        let resp = self
            .client
            .post(EMBEDDINGS_URL)
            .bearer_auth(self.api_key.trim())
            .json(&body)
            .send()
            .await
            .map_err(|e| LecternError::Embedding(format!("embeddings request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(LecternError::Embedding(format!(
                "embeddings API returned {}: {}",
                status, text
            )));
        }

        let parsed: EmbeddingResponse = resp
            .json()
            .await
            .map_err(|e| LecternError::Embedding(format!("invalid embeddings response: {}", e)))?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| LecternError::Embedding("embeddings response was empty".to_string()))?;

        debug!(model = %self.model, dims = vector.len(), "Embedding generated");
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ---------------------------------------------------------------------------
// MockEmbedding - deterministic hash-based vectors for testing
// ---------------------------------------------------------------------------

/// Mock embedding service that returns deterministic 1536-dimensional vectors.
///
/// The output is derived from a hash of the input text, so identical inputs
/// always produce identical outputs. This allows testing retrieval ordering
/// without a real model.
#[derive(Debug, Clone, Default)]
pub struct MockEmbedding;

impl MockEmbedding {
    pub fn new() -> Self {
        Self
    }

    fn hash_to_vector(text: &str) -> Vec<f32> {
        let mut result = Vec::with_capacity(1536);
        for i in 0..1536 {
            let mut hasher = DefaultHasher::new();
            text.hash(&mut hasher);
            i.hash(&mut hasher);
            let h = hasher.finish();
            let val = ((h as f64) / (u64::MAX as f64)) * 2.0 - 1.0;
            result.push(val as f32);
        }

        // L2-normalize so cosine scoring in the in-memory index behaves like
        // the production index over unit vectors.
        let norm: f32 = result.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for val in &mut result {
                *val /= norm;
            }
        }

        result
    }
}

#[async_trait]
impl EmbeddingService for MockEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LecternError> {
        if text.is_empty() {
            return Err(LecternError::Embedding(
                "cannot embed empty text".to_string(),
            ));
        }
        Ok(Self::hash_to_vector(text))
    }

    fn dimensions(&self) -> usize {
        1536
    }
}
