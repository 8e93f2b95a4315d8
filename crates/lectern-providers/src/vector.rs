//! Vector index trait and implementations.
//!
//! `PineconeIndex` speaks the Pinecone HTTP API: the control plane resolves
//! the index host once at startup, then upsert/query go to the data plane
//! scoped to a namespace. `InMemoryIndex` is a brute-force cosine test double
//! with the same overwrite-by-id semantics.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use lectern_core::error::LecternError;
use lectern_core::types::{ProfessorMetadata, ProfessorRecord, QueryMatch};

/// A vector store mapping professor ids to embeddings plus metadata,
/// queryable for the k most similar vectors.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert or overwrite one record keyed by its id.
    async fn upsert(&self, record: ProfessorRecord) -> Result<(), LecternError>;

    /// Return the `top_k` nearest records to the query vector, with metadata,
    /// ordered by descending similarity.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>, LecternError>;
}

// ---------------------------------------------------------------------------
// PineconeIndex - Pinecone HTTP API
// ---------------------------------------------------------------------------

const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";

/// Pinecone-backed vector index scoped to one namespace.
#[derive(Debug, Clone)]
pub struct PineconeIndex {
    client: reqwest::Client,
    api_key: String,
    host: String,
    namespace: String,
}

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<&'a ProfessorRecord>,
    namespace: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    namespace: &'a str,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

impl PineconeIndex {
    /// Resolve the index host via the control plane and return a connected
    /// client for the given namespace.
    pub async fn connect(
        api_key: String,
        index_name: &str,
        namespace: String,
    ) -> Result<Self, LecternError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| LecternError::Index(format!("failed to build HTTP client: {}", e)))?;

        let url = format!("{}/indexes/{}", CONTROL_PLANE_URL, index_name);
        let resp = client
            .get(&url)
            .header("Api-Key", api_key.trim())
            .send()
            .await
            .map_err(|e| LecternError::Index(format!("describe index failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(LecternError::Index(format!(
                "describe index returned {}: {}",
                status, text
            )));
        }

        let described: DescribeIndexResponse = resp
            .json()
            .await
            .map_err(|e| LecternError::Index(format!("invalid describe response: {}", e)))?;

        info!(index = index_name, host = %described.host, "Vector index host resolved");

        Ok(Self {
            client,
            api_key,
            host: described.host,
            namespace,
        })
    }

    fn data_url(&self, path: &str) -> String {
        // The control plane returns a bare hostname.
        format!("https://{}/{}", self.host, path)
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn upsert(&self, record: ProfessorRecord) -> Result<(), LecternError> {
        let body = UpsertRequest {
            vectors: vec![&record],
            namespace: &self.namespace,
        };

        let resp = self
            .client
            .post(self.data_url("vectors/upsert"))
            .header("Api-Key", self.api_key.trim())
            .json(&body)
            .send()
            .await
            .map_err(|e| LecternError::Index(format!("upsert request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(LecternError::Index(format!(
                "upsert returned {}: {}",
                status, text
            )));
        }

        debug!(id = %record.id, namespace = %self.namespace, "Record upserted");
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>, LecternError> {
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            namespace: &self.namespace,
        };

        let resp = self
            .client
            .post(self.data_url("query"))
            .header("Api-Key", self.api_key.trim())
            .json(&body)
            .send()
            .await
            .map_err(|e| LecternError::Index(format!("query request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(LecternError::Index(format!(
                "query returned {}: {}",
                status, text
            )));
        }

        let parsed: QueryResponse = resp
            .json()
            .await
            .map_err(|e| LecternError::Index(format!("invalid query response: {}", e)))?;

        debug!(
            matches = parsed.matches.len(),
            namespace = %self.namespace,
            "Index queried"
        );
        Ok(parsed.matches)
    }
}

// ---------------------------------------------------------------------------
// InMemoryIndex - brute-force cosine test double
// ---------------------------------------------------------------------------

/// In-memory vector index using brute-force cosine similarity.
///
/// Thread-safe via interior RwLock. Mirrors the production index's contract:
/// upserting an existing id overwrites, queries return descending-similarity
/// matches with metadata attached.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    entries: RwLock<HashMap<String, (Vec<f32>, ProfessorMetadata)>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch a stored record's metadata by id.
    pub fn get(&self, id: &str) -> Option<ProfessorMetadata> {
        self.entries
            .read()
            .ok()
            .and_then(|e| e.get(id).map(|(_, m)| m.clone()))
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn upsert(&self, record: ProfessorRecord) -> Result<(), LecternError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| LecternError::Index(format!("lock poisoned: {}", e)))?;
        entries.insert(record.id, (record.values, record.metadata));
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>, LecternError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| LecternError::Index(format!("lock poisoned: {}", e)))?;

        let mut scored: Vec<QueryMatch> = entries
            .iter()
            .map(|(id, (embedding, metadata))| QueryMatch {
                id: id.clone(),
                score: cosine_similarity(vector, embedding),
                metadata: Some(metadata.clone()),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        Ok(scored)
    }
}
