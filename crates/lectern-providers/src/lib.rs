//! Lectern providers crate - clients for the three external services.
//!
//! Each capability is a trait with a production HTTP client and a test
//! double: `EmbeddingService` (OpenAI embeddings), `VectorIndex` (Pinecone
//! upsert/query), and `GenerationService` (OpenAI streamed chat completions).
//! Nothing in this crate owns pipeline logic; it only speaks the wire
//! contracts and converts failures into `LecternError`.

pub mod embedding;
pub mod generation;
pub mod vector;

pub use embedding::{EmbeddingService, MockEmbedding, OpenAiEmbedding};
pub use generation::{CompletionStream, GenerationService, MockGeneration, OpenAiGeneration};
pub use vector::{InMemoryIndex, PineconeIndex, VectorIndex};
