//! Query pipeline: embed, retrieve, assemble, stream.

use std::sync::Arc;

use futures_util::StreamExt;
use tracing::debug;

use lectern_core::error::LecternError;
use lectern_core::types::ConversationMessage;
use lectern_providers::{CompletionStream, EmbeddingService, GenerationService, VectorIndex};

use crate::prompt;

/// Number of nearest professors retrieved per query.
pub const TOP_K: usize = 3;

/// The retrieval-augmented query pipeline.
///
/// Stateless per request: embeds the last user turn, retrieves the nearest
/// professors, appends the formatted context, and streams the completion.
pub struct QueryPipeline {
    embedder: Arc<dyn EmbeddingService>,
    index: Arc<dyn VectorIndex>,
    generator: Arc<dyn GenerationService>,
}

impl QueryPipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingService>,
        index: Arc<dyn VectorIndex>,
        generator: Arc<dyn GenerationService>,
    ) -> Self {
        Self {
            embedder,
            index,
            generator,
        }
    }

    /// Answer a conversation with a streamed recommendation.
    ///
    /// Failures of the embedding or index call surface here, before any
    /// bytes are produced; a failure after streaming begins travels through
    /// the returned stream as an `Err` item and terminates it.
    pub async fn respond(
        &self,
        messages: &[ConversationMessage],
    ) -> Result<CompletionStream, LecternError> {
        let last = messages.last().ok_or_else(|| {
            LecternError::MalformedInput("message list must not be empty".to_string())
        })?;

        let vector = self.embedder.embed(&last.content).await?;
        let matches = self.index.query(&vector, TOP_K).await?;
        debug!(matches = matches.len(), "Retrieved nearest professors");

        let augmented = format!("{}{}", last.content, prompt::format_results(&matches));
        let assembled =
            prompt::assemble_messages(&messages[..messages.len() - 1], augmented);

        let stream = self.generator.stream_complete(&assembled).await?;

        // Empty increments carry nothing; drop them rather than emitting
        // zero-length body chunks.
        Ok(Box::pin(stream.filter(|item| {
            futures_util::future::ready(!matches!(item, Ok(text) if text.is_empty()))
        })))
    }
}
