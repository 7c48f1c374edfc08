//! Vector index client trait.

use async_trait::async_trait;

use crate::document::{PointRecord, RetrievedChunk};
use crate::error::{RagError, Result};

/// A client over the vector store collaborator.
///
/// Implementations manage named collections of chunk vectors keyed by
/// `(document_id, chunk_index)` and support overwrite-by-key upserts and
/// cosine-similarity search.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the collection if absent. Idempotent.
    ///
    /// # Errors
    ///
    /// [`RagError::DimensionMismatch`] if the collection exists with a
    /// different vector size; [`RagError::IndexUnavailable`] on
    /// connectivity failure.
    async fn ensure_collection(&self, name: &str, dimension: usize) -> Result<()>;

    /// Upsert points with overwrite-by-key semantics. Returns the number
    /// of points written.
    async fn upsert(&self, collection: &str, points: &[PointRecord]) -> Result<usize>;

    /// Return up to `top_k` chunks ordered by descending similarity to
    /// `vector`. Fewer than `top_k` results is not an error.
    ///
    /// # Errors
    ///
    /// [`RagError::InvalidTopK`] if `top_k == 0`.
    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>>;

    /// Delete every point belonging to `document_id`. Used to prune stale
    /// chunks before re-indexing a document that may have shrunk.
    async fn delete_document(&self, collection: &str, document_id: &str) -> Result<()>;

    /// Delete and recreate the collection empty. Destructive.
    async fn reset(&self, collection: &str, dimension: usize) -> Result<()>;

    /// Number of points currently in the collection.
    async fn count(&self, collection: &str) -> Result<usize>;
}

/// Shared `top_k` validation for [`VectorIndex`] backends.
pub(crate) fn validate_top_k(top_k: usize) -> Result<()> {
    if top_k == 0 {
        return Err(RagError::InvalidTopK(top_k));
    }
    Ok(())
}
