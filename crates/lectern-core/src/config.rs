use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{LecternError, Result};

/// Top-level configuration for the Lectern service.
///
/// Loaded from a TOML file; every section falls back to defaults when absent.
/// API credentials are deliberately not part of this file — they come from the
/// environment (`OPENAI_API_KEY`, `PINECONE_API_KEY`) in the composition root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LecternConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub models: ModelConfig,
}

impl LecternConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LecternConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| LecternError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to bind on 127.0.0.1.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            log_level: "info".to_string(),
        }
    }
}

/// Vector index identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Index name as registered with the index service.
    pub name: String,
    /// Logical partition inside the index holding professor records.
    pub namespace: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: "rag".to_string(),
            namespace: "ns1".to_string(),
        }
    }
}

/// Model identifiers for the embedding and generation services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Embedding model; its output dimension must match the index.
    pub embedding: String,
    /// Chat completion model used for recommendation synthesis.
    pub chat: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            embedding: "text-embedding-3-small".to_string(),
            chat: "gpt-4o-mini".to_string(),
        }
    }
}
