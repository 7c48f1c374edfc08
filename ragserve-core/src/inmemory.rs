//! In-memory vector index using cosine similarity.
//!
//! A zero-infrastructure [`VectorIndex`] backed by a `HashMap` behind a
//! `tokio::sync::RwLock`. Suitable for tests and local development; the
//! production backend is [`QdrantIndex`](crate::qdrant::QdrantIndex).

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{PointRecord, RetrievedChunk};
use crate::error::{RagError, Result};
use crate::index::{validate_top_k, VectorIndex};

#[derive(Debug)]
struct Collection {
    dimension: usize,
    /// Keyed by `(document_id, chunk_index)` — overwrite-by-key.
    points: HashMap<(String, usize), PointRecord>,
}

/// An in-memory [`VectorIndex`] with cosine-similarity search.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cosine similarity of two vectors; 0.0 if either has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn missing(collection: &str) -> RagError {
    RagError::IndexUnavailable(format!("collection '{collection}' does not exist"))
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn ensure_collection(&self, name: &str, dimension: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        match collections.get(name) {
            Some(existing) if existing.dimension != dimension => Err(RagError::DimensionMismatch {
                collection: name.to_string(),
                existing: existing.dimension,
                requested: dimension,
            }),
            Some(_) => Ok(()),
            None => {
                collections
                    .insert(name.to_string(), Collection { dimension, points: HashMap::new() });
                Ok(())
            }
        }
    }

    async fn upsert(&self, collection: &str, points: &[PointRecord]) -> Result<usize> {
        let mut collections = self.collections.write().await;
        let state = collections.get_mut(collection).ok_or_else(|| missing(collection))?;
        for point in points {
            state
                .points
                .insert((point.document_id.clone(), point.chunk_index), point.clone());
        }
        Ok(points.len())
    }

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>> {
        validate_top_k(top_k)?;
        let collections = self.collections.read().await;
        let state = collections.get(collection).ok_or_else(|| missing(collection))?;

        let mut scored: Vec<RetrievedChunk> = state
            .points
            .values()
            .map(|point| RetrievedChunk {
                score: cosine_similarity(&point.vector, vector),
                text: point.text.clone(),
                source: point.source.clone(),
                chunk_index: point.chunk_index,
                document_id: point.document_id.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn delete_document(&self, collection: &str, document_id: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        let state = collections.get_mut(collection).ok_or_else(|| missing(collection))?;
        state.points.retain(|(doc, _), _| doc != document_id);
        Ok(())
    }

    async fn reset(&self, collection: &str, dimension: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.insert(collection.to_string(), Collection { dimension, points: HashMap::new() });
        Ok(())
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        let collections = self.collections.read().await;
        let state = collections.get(collection).ok_or_else(|| missing(collection))?;
        Ok(state.points.len())
    }
}
