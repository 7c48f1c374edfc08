//! Shared application state.

use std::sync::Arc;

use ragserve_core::{
    Embedder, Generator, IngestionPipeline, QueryPipeline, RagConfig, TextExtractor, VectorIndex,
};

/// Everything a request handler needs, constructed once at startup and
/// shared behind an `Arc`. The collaborators inside the pipelines are the
/// process-wide instances; nothing is re-loaded per request.
pub struct AppState {
    /// The loaded configuration.
    pub config: RagConfig,
    /// The ingestion pipeline for `POST /index`.
    pub ingestion: IngestionPipeline,
    /// The query pipeline for `POST /chat`.
    pub query: QueryPipeline,
    /// Direct index handle for `DELETE /collection`.
    pub index: Arc<dyn VectorIndex>,
    /// Embedding dimensionality, fixed at startup.
    pub dimension: usize,
    /// Generation model identifier, reported by `/health`.
    pub generation_model: String,
}

impl AppState {
    /// Wire the pipelines from configuration and collaborators.
    pub fn new(
        config: RagConfig,
        extractor: Arc<dyn TextExtractor>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        let dimension = embedder.dimension();
        let generation_model = generator.model().to_string();
        let ingestion =
            IngestionPipeline::new(&config, extractor, embedder.clone(), index.clone());
        let query = QueryPipeline::new(&config, embedder, index.clone(), generator);
        Self { config, ingestion, query, index, dimension, generation_model }
    }
}
