//! Generator adapter: prompt → generated text under a token budget.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{RagError, Result};

/// A prompt-to-text interface over the language model collaborator.
///
/// Implementations do not retry on failure; generation is expensive and a
/// silent retry would double latency and cost. Retry policy, if any,
/// belongs to the caller. Output is not required to be deterministic.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for `prompt` with at most `max_new_tokens`
    /// new tokens.
    ///
    /// # Errors
    ///
    /// [`RagError::InvalidGenerationBudget`] if `max_new_tokens == 0`,
    /// before any model call; [`RagError::GenerationFailure`] if the model
    /// fails or times out.
    async fn generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String>;

    /// The generation model identifier.
    fn model(&self) -> &str;
}

/// A [`Generator`] backed by an Ollama-compatible `/api/generate` endpoint.
///
/// Non-streaming: the full completion is returned in one response.
/// Sampling parameters are fixed (temperature 0.7, top_p 0.9).
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaGenerator {
    /// Create a generator for the given service URL and model.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), base_url: base_url.into(), model: model.into() }
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String> {
        if max_new_tokens == 0 {
            return Err(RagError::InvalidGenerationBudget(max_new_tokens));
        }

        debug!(model = %self.model, prompt_len = prompt.len(), max_new_tokens, "generating");

        let map_err = |message: String| {
            error!(model = %self.model, %message, "generation request failed");
            RagError::GenerationFailure { model: self.model.clone(), message }
        };

        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions { num_predict: max_new_tokens, temperature: 0.7, top_p: 0.9 },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| map_err(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(map_err(format!("service returned {status}: {text}")));
        }

        let parsed: GenerateResponse =
            response.json().await.map_err(|e| map_err(format!("malformed response: {e}")))?;

        Ok(parsed.response.trim().to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
