//! Ingestion pipeline: extraction → chunking → embedding → indexing.

use std::sync::Arc;

use tracing::info;

use crate::chunking::chunk;
use crate::config::RagConfig;
use crate::document::{Document, IngestReport, PointRecord};
use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::extract::TextExtractor;
use crate::index::VectorIndex;

/// Orchestrates document ingestion.
///
/// Per document the pipeline runs extraction, chunking, batch embedding,
/// and an overwrite-by-key upsert. Embedding is completed for every chunk
/// before anything is written, so an embedding failure leaves the index
/// untouched. There is no compensating rollback for an upsert failure;
/// re-ingesting the document overwrites whatever was left behind.
pub struct IngestionPipeline {
    extractor: Arc<dyn TextExtractor>,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    collection: String,
    chunk_size: usize,
    chunk_overlap: usize,
    embed_batch_size: usize,
}

impl IngestionPipeline {
    /// Build a pipeline from configuration and collaborators.
    pub fn new(
        config: &RagConfig,
        extractor: Arc<dyn TextExtractor>,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            extractor,
            embedder,
            index,
            collection: config.collection.clone(),
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            embed_batch_size: config.embed_batch_size,
        }
    }

    /// Ingest an uploaded document under a freshly minted ID.
    ///
    /// An empty document (zero chunks) is a terminal success with
    /// `chunks_indexed = 0`.
    ///
    /// # Errors
    ///
    /// [`RagError::UnsupportedFormat`] / [`RagError::ExtractionError`] from
    /// the extractor, [`RagError::EmbeddingFailure`] from the embedder
    /// (nothing written in that case), [`RagError::IndexUnavailable`] from
    /// the index.
    pub async fn ingest(
        &self,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<IngestReport> {
        let document = Document::new(filename, content_type, bytes.len());
        info!(
            document.id = %document.id,
            filename,
            byte_len = document.byte_len,
            "received document"
        );

        let text = self.extractor.extract(filename, bytes)?;
        let chunks_indexed = self.index_text(&document.id, filename, &text).await?;
        Ok(IngestReport { document_id: document.id, chunks_indexed })
    }

    /// Chunk, embed, and index `text` under a caller-supplied document ID.
    ///
    /// Prior points for the ID are deleted before the new set is written,
    /// so a re-ingestion that produces fewer chunks leaves no stale
    /// trailing points. Returns the number of chunks written.
    pub async fn index_text(&self, document_id: &str, source: &str, text: &str) -> Result<usize> {
        let spans = chunk(text, self.chunk_size, self.chunk_overlap)?;

        if spans.is_empty() {
            self.index.delete_document(&self.collection, document_id).await?;
            info!(document.id = %document_id, chunk_count = 0_usize, "indexed document (empty)");
            return Ok(0);
        }

        // Embed everything before touching the index: all-or-nothing.
        let mut vectors = Vec::with_capacity(spans.len());
        for batch in spans.chunks(self.embed_batch_size) {
            let texts: Vec<&str> = batch.iter().map(|s| s.text.as_str()).collect();
            vectors.extend(self.embedder.embed(&texts).await?);
        }
        if vectors.len() != spans.len() {
            return Err(RagError::EmbeddingFailure {
                batch_size: spans.len(),
                message: format!("expected {} vectors, got {}", spans.len(), vectors.len()),
            });
        }

        let points: Vec<PointRecord> = spans
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(chunk_index, (span, vector))| PointRecord {
                document_id: document_id.to_string(),
                chunk_index,
                text: span.text,
                source: source.to_string(),
                vector,
            })
            .collect();

        self.index.delete_document(&self.collection, document_id).await?;
        let written = self.index.upsert(&self.collection, &points).await?;
        info!(document.id = %document_id, chunk_count = written, "indexed document");
        Ok(written)
    }
}
