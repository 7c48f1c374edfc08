//! Embedder adapter: batch text → fixed-dimension vectors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{RagError, Result};

/// A batch interface over the embedding model collaborator.
///
/// Implementations return one vector per input string, in input order, all
/// of dimensionality [`dimension()`](Embedder::dimension). A call is
/// all-or-nothing: on failure no partial batch is returned.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts. An empty batch returns an empty `Vec`,
    /// not an error.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// The output dimensionality of this embedder.
    fn dimension(&self) -> usize;
}

/// An [`Embedder`] backed by an OpenAI-compatible `/v1/embeddings` endpoint
/// (text-embeddings-inference, llama.cpp server, OpenAI itself).
///
/// The model is loaded by the remote service once; this adapter holds no
/// model state beyond the discovered output dimensionality. Construct it
/// once at startup via [`connect`](HttpEmbedder::connect) and share it
/// behind an `Arc`.
pub struct HttpEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimension: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    /// Connect to the embedding service and discover its output
    /// dimensionality by embedding a single probe string.
    ///
    /// Runs once before the server starts accepting requests, so the
    /// probe doubles as a readiness check.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmbeddingFailure`] if the service is
    /// unreachable or returns a malformed response.
    pub async fn connect(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let mut embedder = Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            dimension: 0,
        };
        let probe = embedder.request(&["dimension probe"]).await?;
        let dimension = probe.first().map(Vec::len).unwrap_or(0);
        if dimension == 0 {
            return Err(RagError::EmbeddingFailure {
                batch_size: 1,
                message: "probe returned no embedding".to_string(),
            });
        }
        embedder.dimension = dimension;
        info!(model = %embedder.model, dimension, "embedding service ready");
        Ok(embedder)
    }

    /// Build an embedder with a known dimensionality, skipping the probe.
    pub fn with_dimension(
        base_url: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            dimension,
        }
    }

    /// The embedding model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let batch_size = texts.len();
        let map_err = |message: String| {
            error!(batch_size, %message, "embedding request failed");
            RagError::EmbeddingFailure { batch_size, message }
        };

        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .json(&EmbeddingRequest { model: &self.model, input: texts })
            .send()
            .await
            .map_err(|e| map_err(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(map_err(format!("service returned {status}: {body}")));
        }

        let parsed: EmbeddingResponse =
            response.json().await.map_err(|e| map_err(format!("malformed response: {e}")))?;

        if parsed.data.len() != batch_size {
            return Err(map_err(format!(
                "expected {batch_size} embeddings, got {}",
                parsed.data.len()
            )));
        }

        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(batch_size = texts.len(), model = %self.model, "embedding batch");
        self.request(texts).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_batch_short_circuits_without_io() {
        // Unroutable address: any actual request would fail loudly.
        let embedder = HttpEmbedder::with_dimension("http://192.0.2.1:1", "test-model", 4);
        let out = embedder.embed(&[]).await.unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn with_dimension_reports_given_dimension() {
        let embedder = HttpEmbedder::with_dimension("http://localhost:8080", "m", 384);
        assert_eq!(embedder.dimension(), 384);
    }
}
