//! Lectern application binary - composition root.
//!
//! Ties together the Lectern crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Read service credentials from the environment
//! 3. Build the provider clients (embeddings, vector index, generation)
//! 4. Wire the ingestion and query pipelines
//! 5. Start the axum REST API server

use std::path::PathBuf;
use std::sync::Arc;

use lectern_api::{routes, state::AppState};
use lectern_core::config::LecternConfig;
use lectern_providers::{OpenAiEmbedding, OpenAiGeneration, PineconeIndex};
use lectern_rag::{IngestPipeline, QueryPipeline};
use lectern_scrape::ChromeRenderer;

/// Resolve the config file path (LECTERN_CONFIG env, or ~/.lectern/config.toml).
fn config_path() -> PathBuf {
    if let Ok(p) = std::env::var("LECTERN_CONFIG") {
        return PathBuf::from(p);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".lectern").join("config.toml");
    }
    PathBuf::from("config.toml")
}

/// Read a required credential from the environment.
fn require_env(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    std::env::var(name).map_err(|_| format!("{} must be set in the environment", name).into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Lectern v{}", env!("CARGO_PKG_VERSION"));

    // Config.
    let config_file = config_path();
    let config = LecternConfig::load_or_default(&config_file);
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Credentials come from the environment, never from the config file.
    let openai_key = require_env("OPENAI_API_KEY")?;
    let pinecone_key = require_env("PINECONE_API_KEY")?;

    // Provider clients.
    let embedder = Arc::new(OpenAiEmbedding::new(
        openai_key.clone(),
        config.models.embedding.clone(),
    )?);
    let generator = Arc::new(OpenAiGeneration::new(
        openai_key,
        config.models.chat.clone(),
    )?);

    let index = Arc::new(
        PineconeIndex::connect(
            pinecone_key,
            &config.index.name,
            config.index.namespace.clone(),
        )
        .await?,
    );
    tracing::info!(
        index = %config.index.name,
        namespace = %config.index.namespace,
        "Vector index connected"
    );

    // Pipelines.
    let ingest = IngestPipeline::new(
        Arc::new(ChromeRenderer::new()),
        Arc::clone(&embedder) as Arc<dyn lectern_providers::EmbeddingService>,
        Arc::clone(&index) as Arc<dyn lectern_providers::VectorIndex>,
    );
    let query = QueryPipeline::new(
        embedder,
        index,
        generator,
    );
    let state = AppState::new(ingest, query);

    // API server. LECTERN_PORT overrides the config for quick relocation.
    let port = std::env::var("LECTERN_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(config.server.port);

    routes::start_server(port, state).await?;

    Ok(())
}
