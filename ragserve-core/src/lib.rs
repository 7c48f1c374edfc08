//! Retrieval-Augmented Generation pipeline.
//!
//! Two pipelines share a vector index and two model collaborators:
//!
//! - [`IngestionPipeline`] turns an uploaded document into searchable
//!   vector points: extraction → chunking → embedding → upsert.
//! - [`QueryPipeline`] turns a question into a grounded, source-attributed
//!   answer: query embedding → retrieval → prompt assembly → generation.
//!
//! Collaborators sit behind traits ([`Embedder`], [`Generator`],
//! [`VectorIndex`], [`TextExtractor`]) and are constructed once at process
//! startup, then injected as shared `Arc`s — there is no global mutable
//! model state.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragserve_core::{
//!     HttpEmbedder, IngestionPipeline, OllamaGenerator, PlainTextExtractor,
//!     QdrantIndex, QueryPipeline, RagConfig, VectorIndex,
//! };
//!
//! let config = RagConfig::from_env()?;
//! let embedder = Arc::new(
//!     HttpEmbedder::connect(&config.embedding_url, &config.embedding_model).await?,
//! );
//! let index: Arc<dyn VectorIndex> = Arc::new(QdrantIndex::new(&config.qdrant_url)?);
//! index.ensure_collection(&config.collection, embedder.dimension()).await?;
//!
//! let ingestion = IngestionPipeline::new(
//!     &config,
//!     Arc::new(PlainTextExtractor::new()),
//!     embedder.clone(),
//!     index.clone(),
//! );
//! let report = ingestion.ingest("notes.txt", "text/plain", b"hello world").await?;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod generation;
pub mod index;
pub mod ingest;
pub mod inmemory;
pub mod prompt;
pub mod qdrant;
pub mod query;

pub use chunking::{chunk, ChunkSpan};
pub use config::RagConfig;
pub use document::{point_id, Answer, Document, IngestReport, PointRecord, RetrievedChunk};
pub use embedding::{Embedder, HttpEmbedder};
pub use error::{RagError, Result};
pub use extract::{PlainTextExtractor, TextExtractor};
pub use generation::{Generator, OllamaGenerator};
pub use index::VectorIndex;
pub use ingest::IngestionPipeline;
pub use inmemory::InMemoryIndex;
pub use prompt::{build_prompt, PromptBundle, NO_CONTEXT_NOTICE, SYSTEM_INSTRUCTION};
pub use qdrant::QdrantIndex;
pub use query::{ChatRequest, QueryPipeline};
