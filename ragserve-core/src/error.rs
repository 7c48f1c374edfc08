//! Error types for the `ragserve-core` crate.

use thiserror::Error;

/// Errors that can occur in the ingestion and query pipelines.
///
/// Parameter-validation variants are produced at the boundary before any
/// collaborator is invoked. Collaborator failures (extraction, embedding,
/// generation, index) are surfaced without automatic retry; the caller
/// decides on retry or user messaging.
#[derive(Debug, Error)]
pub enum RagError {
    /// Chunker parameters violate `size > 0` or `0 <= overlap < size`.
    #[error("invalid chunk parameters: size={size}, overlap={overlap} (require size > 0 and overlap < size)")]
    InvalidChunkParameters {
        /// The requested window size in characters.
        size: usize,
        /// The requested overlap in characters.
        overlap: usize,
    },

    /// A query request failed parameter validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A search was attempted with `top_k` below 1.
    #[error("invalid top_k: {0} (must be at least 1)")]
    InvalidTopK(usize),

    /// A generation was attempted with a zero token budget.
    #[error("invalid generation budget: {0} (must be at least 1)")]
    InvalidGenerationBudget(u32),

    /// The uploaded file type is not handled by the text extractor.
    #[error("unsupported format: '{filename}'")]
    UnsupportedFormat {
        /// The original filename of the rejected upload.
        filename: String,
    },

    /// Text extraction failed for a supported file type.
    #[error("extraction failed for '{filename}': {message}")]
    ExtractionError {
        /// The original filename of the document.
        filename: String,
        /// A description of the failure.
        message: String,
    },

    /// The embedding collaborator failed or timed out.
    ///
    /// Embedding is all-or-nothing per call; no partial batch is returned.
    #[error("embedding failed for batch of {batch_size}: {message}")]
    EmbeddingFailure {
        /// The number of texts in the attempted batch.
        batch_size: usize,
        /// A description of the failure.
        message: String,
    },

    /// The language model collaborator failed or timed out.
    #[error("generation failed ({model}): {message}")]
    GenerationFailure {
        /// The generation model identifier.
        model: String,
        /// A description of the failure.
        message: String,
    },

    /// The vector store could not be reached or rejected the operation.
    #[error("vector index unavailable: {0}")]
    IndexUnavailable(String),

    /// An existing collection has a different vector dimensionality than
    /// the embedding model produces.
    #[error("dimension mismatch for collection '{collection}': existing={existing}, requested={requested}")]
    DimensionMismatch {
        /// The collection name.
        collection: String,
        /// The dimensionality the collection was created with.
        existing: usize,
        /// The dimensionality being requested now.
        requested: usize,
    },

    /// A configuration value failed validation at startup.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
