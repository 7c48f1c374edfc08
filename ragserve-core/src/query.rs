//! Query pipeline: embed → retrieve → prompt → generate → assemble.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::RagConfig;
use crate::document::Answer;
use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::generation::Generator;
use crate::index::VectorIndex;
use crate::prompt::build_prompt;

/// A question plus its retrieval and generation parameters. Ephemeral —
/// nothing about a request is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user question.
    pub query: String,
    /// Maximum number of chunks to retrieve.
    pub top_k: usize,
    /// Generation token budget.
    pub max_new_tokens: u32,
}

/// Orchestrates grounded answering.
pub struct QueryPipeline {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    generator: Arc<dyn Generator>,
    collection: String,
    max_prompt_chars: usize,
}

impl QueryPipeline {
    /// Build a pipeline from configuration and collaborators.
    pub fn new(
        config: &RagConfig,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            embedder,
            index,
            generator,
            collection: config.collection.clone(),
            max_prompt_chars: config.max_prompt_chars,
        }
    }

    /// Answer a question grounded in retrieved chunks.
    ///
    /// An empty or unavailable collection does not fail the request: the
    /// generator still runs, with a prompt stating that no grounding
    /// context was found, and `sources` comes back empty. The returned
    /// sources are exactly the chunks rendered into the prompt.
    ///
    /// # Errors
    ///
    /// [`RagError::InvalidRequest`] before any collaborator call if the
    /// query is blank, `top_k == 0`, or `max_new_tokens == 0`;
    /// [`RagError::EmbeddingFailure`] / [`RagError::GenerationFailure`]
    /// from the model collaborators.
    pub async fn answer(&self, request: &ChatRequest) -> Result<Answer> {
        if request.query.trim().is_empty() {
            return Err(RagError::InvalidRequest("query must not be empty".to_string()));
        }
        if request.top_k == 0 {
            return Err(RagError::InvalidRequest("top_k must be at least 1".to_string()));
        }
        if request.max_new_tokens == 0 {
            return Err(RagError::InvalidRequest("max_new_tokens must be at least 1".to_string()));
        }

        let mut embedded = self.embedder.embed(&[request.query.as_str()]).await?;
        let query_vector = if embedded.is_empty() {
            return Err(RagError::EmbeddingFailure {
                batch_size: 1,
                message: "embedder returned no vector for the query".to_string(),
            });
        } else {
            embedded.swap_remove(0)
        };

        let retrieved =
            match self.index.search(&self.collection, &query_vector, request.top_k).await {
                Ok(results) => results,
                Err(RagError::IndexUnavailable(message)) => {
                    warn!(%message, "retrieval unavailable, answering without context");
                    Vec::new()
                }
                Err(e) => return Err(e),
            };
        let retrieved_count = retrieved.len();

        let bundle = build_prompt(&request.query, retrieved, self.max_prompt_chars);
        let answer = self.generator.generate(&bundle.prompt, request.max_new_tokens).await?;

        info!(
            retrieved = retrieved_count,
            cited = bundle.sources.len(),
            answer_len = answer.len(),
            "answered query"
        );

        Ok(Answer { answer, sources: bundle.sources })
    }
}
