//! Service configuration loaded from the environment.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration for the ingestion and query pipelines and their
/// collaborators. All values are optional in the environment and fall back
/// to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Qdrant gRPC endpoint.
    pub qdrant_url: String,
    /// The active collection; one per deployment.
    pub collection: String,
    /// Base URL of the embedding service (OpenAI-compatible `/v1/embeddings`).
    pub embedding_url: String,
    /// Embedding model identifier.
    pub embedding_model: String,
    /// Base URL of the generation service (Ollama-compatible `/api/generate`).
    pub generation_url: String,
    /// Generation model identifier.
    pub generation_model: String,
    /// Chunk window size in characters.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters.
    pub chunk_overlap: usize,
    /// Default number of chunks to retrieve per query.
    pub top_k: usize,
    /// Default generation token budget.
    pub max_new_tokens: u32,
    /// Maximum characters of assembled prompt; lowest-scoring context is
    /// dropped first when exceeded.
    pub max_prompt_chars: usize,
    /// Ceiling on texts per embedding call during ingestion.
    pub embed_batch_size: usize,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            qdrant_url: "http://localhost:6334".to_string(),
            collection: "rag_documents".to_string(),
            embedding_url: "http://localhost:8080".to_string(),
            embedding_model: "BAAI/bge-small-en-v1.5".to_string(),
            generation_url: "http://localhost:11434".to_string(),
            generation_model: "qwen2.5:0.5b-instruct".to_string(),
            chunk_size: 512,
            chunk_overlap: 64,
            top_k: 5,
            max_new_tokens: 512,
            max_prompt_chars: 8000,
            embed_batch_size: 32,
            bind_addr: "0.0.0.0:8000".to_string(),
        }
    }
}

impl RagConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset, then validate.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if a set variable does not parse,
    /// or if the resulting values are inconsistent (see [`validate`](Self::validate)).
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            qdrant_url: env_string("QDRANT_URL", defaults.qdrant_url),
            collection: env_string("QDRANT_COLLECTION", defaults.collection),
            embedding_url: env_string("EMBEDDING_URL", defaults.embedding_url),
            embedding_model: env_string("EMBEDDING_MODEL", defaults.embedding_model),
            generation_url: env_string("GENERATION_URL", defaults.generation_url),
            generation_model: env_string("GENERATION_MODEL", defaults.generation_model),
            chunk_size: env_parse("CHUNK_SIZE", defaults.chunk_size)?,
            chunk_overlap: env_parse("CHUNK_OVERLAP", defaults.chunk_overlap)?,
            top_k: env_parse("TOP_K", defaults.top_k)?,
            max_new_tokens: env_parse("MAX_NEW_TOKENS", defaults.max_new_tokens)?,
            max_prompt_chars: env_parse("MAX_PROMPT_CHARS", defaults.max_prompt_chars)?,
            embed_batch_size: env_parse("EMBED_BATCH_SIZE", defaults.embed_batch_size)?,
            bind_addr: env_string("BIND_ADDR", defaults.bind_addr),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `chunk_size == 0` or `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    /// - `max_new_tokens == 0`
    /// - `embed_batch_size == 0`
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(RagError::ConfigError(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be at least 1".to_string()));
        }
        if self.max_new_tokens == 0 {
            return Err(RagError::ConfigError("max_new_tokens must be at least 1".to_string()));
        }
        if self.embed_batch_size == 0 {
            return Err(RagError::ConfigError("embed_batch_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn env_string(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| RagError::ConfigError(format!("{key} has invalid value '{raw}'"))),
        Err(_) => Ok(default),
    }
}
