//! Data types for documents, index points, retrieved chunks, and answers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A source document accepted for ingestion.
///
/// Documents are immutable once created; re-ingesting the same content
/// mints a new ID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier, generated at ingestion time.
    pub id: String,
    /// Original filename of the upload.
    pub filename: String,
    /// Declared MIME type of the upload.
    pub content_type: String,
    /// Length of the raw upload in bytes.
    pub byte_len: usize,
    /// When the document was received.
    pub ingested_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document record with a fresh ID and the current time.
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        byte_len: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            filename: filename.into(),
            content_type: content_type.into(),
            byte_len,
            ingested_at: Utc::now(),
        }
    }
}

/// A chunk ready to be written to the vector index.
///
/// The logical key is `(document_id, chunk_index)`; [`point_id`] maps it to
/// a deterministic UUID so re-indexing a document overwrites its prior
/// points instead of accumulating duplicates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointRecord {
    /// ID of the parent document.
    pub document_id: String,
    /// 0-based position of the chunk within the document.
    pub chunk_index: usize,
    /// The chunk text.
    pub text: String,
    /// Source filename, carried into the payload for attribution.
    pub source: String,
    /// The embedding vector for `text`.
    pub vector: Vec<f32>,
}

impl PointRecord {
    /// The deterministic point ID for this record.
    pub fn point_id(&self) -> Uuid {
        point_id(&self.document_id, self.chunk_index)
    }
}

/// Derive the vector store point ID for a `(document_id, chunk_index)` pair.
///
/// UUID v5 over the pair, so the mapping is stable across processes.
pub fn point_id(document_id: &str, chunk_index: usize) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("{document_id}/{chunk_index}").as_bytes())
}

/// A chunk returned from vector search, paired with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Cosine similarity to the query vector (higher is more relevant).
    pub score: f32,
    /// The chunk text.
    pub text: String,
    /// Source filename of the parent document.
    pub source: String,
    /// 0-based position of the chunk within its document.
    pub chunk_index: usize,
    /// ID of the parent document.
    pub document_id: String,
}

/// A generated answer together with the chunks that grounded it.
///
/// `sources` are exactly the chunks included in the generation prompt,
/// never a superset of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// The generated answer text.
    pub answer: String,
    /// The retrieved chunks used as context, in descending score order.
    pub sources: Vec<RetrievedChunk>,
}

/// The outcome of a successful ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestReport {
    /// The ID assigned to the ingested document.
    pub document_id: String,
    /// How many chunks were written to the index. Zero for an empty
    /// document, which is a valid terminal success.
    pub chunks_indexed: usize,
}
