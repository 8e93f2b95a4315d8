//! Application state shared across route handlers.
//!
//! AppState holds the two pipelines behind `Arc` for cheap cloning into
//! handler tasks. There is no mutable state: each request runs the
//! pipelines against read-only service clients.

use std::sync::Arc;
use std::time::Instant;

use lectern_rag::{IngestPipeline, QueryPipeline};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Page ingestion pipeline (render + extract + embed + upsert).
    pub ingest: Arc<IngestPipeline>,
    /// Retrieval-augmented query pipeline (embed + query + stream).
    pub query: Arc<QueryPipeline>,
    /// Server start time for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(ingest: IngestPipeline, query: QueryPipeline) -> Self {
        Self {
            ingest: Arc::new(ingest),
            query: Arc::new(query),
            start_time: Instant::now(),
        }
    }
}
