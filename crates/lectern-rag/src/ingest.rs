//! Ingestion pipeline: render, extract, validate, embed, upsert.

use std::sync::Arc;

use tracing::{info, warn};

use lectern_core::error::LecternError;
use lectern_core::types::{ProfessorMetadata, ProfessorRecord};
use lectern_providers::{EmbeddingService, VectorIndex};
use lectern_scrape::{PageRenderer, ProfileExtractor};

/// The professor-page ingestion pipeline.
///
/// Every step is a hard dependency; validation short-circuits before any
/// embedding or index call. Re-ingesting the same professor overwrites the
/// prior record (the index keys on the full name).
pub struct IngestPipeline {
    renderer: Arc<dyn PageRenderer>,
    extractor: ProfileExtractor,
    embedder: Arc<dyn EmbeddingService>,
    index: Arc<dyn VectorIndex>,
}

impl IngestPipeline {
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        embedder: Arc<dyn EmbeddingService>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            renderer,
            extractor: ProfileExtractor::new(),
            embedder,
            index,
        }
    }

    /// Ingest one professor-review page.
    ///
    /// Returns the upserted record. Extraction failures come back as
    /// `LecternError::Extraction` without touching the embedding or index
    /// services; every other failure propagates unretried.
    pub async fn ingest(&self, link: &str) -> Result<ProfessorRecord, LecternError> {
        if link.trim().is_empty() {
            return Err(LecternError::MalformedInput(
                "'link' must be a non-empty URL".to_string(),
            ));
        }

        // Step 1: headless render (the page populates reviews client-side).
        let html = self.renderer.render(link).await?;

        // Step 2: fixed-selector extraction.
        let profile = self.extractor.extract(&html);
        if !profile.is_complete() {
            warn!(
                link,
                name = %profile.name,
                department = %profile.department,
                rating = %profile.rating,
                "Extraction incomplete, rejecting page"
            );
            return Err(LecternError::Extraction(
                "failed to extract professor name, department, or rating".to_string(),
            ));
        }

        // Step 3: embed the concatenated fields.
        let text = format!(
            "{} {} {}",
            profile.name, profile.department, profile.rating
        );
        let values = self.embedder.embed(&text).await?;

        // Step 4: upsert keyed by the full name.
        let record = ProfessorRecord {
            id: profile.name.clone(),
            values,
            metadata: ProfessorMetadata {
                name: profile.name.clone(),
                subject: profile.department,
                stars: profile.rating,
                url: link.to_string(),
            },
        };
        self.index.upsert(record.clone()).await?;

        info!(id = %record.id, link, "Professor ingested");
        Ok(record)
    }
}
