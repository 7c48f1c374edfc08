//! Qdrant vector index backend.
//!
//! [`QdrantIndex`] implements [`VectorIndex`] over the
//! [qdrant-client](https://docs.rs/qdrant-client) gRPC client with cosine
//! distance. Chunk text and attribution travel in the point payload; the
//! point ID is the deterministic UUID derived from
//! `(document_id, chunk_index)`, which is what makes re-indexing a
//! document overwrite its prior points.

use async_trait::async_trait;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::vectors_config::Config as VectorsConfigKind;
use qdrant_client::qdrant::{
    CollectionInfo, Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter,
    PointStruct, SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue,
    VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use tracing::debug;

use crate::document::{PointRecord, RetrievedChunk};
use crate::error::{RagError, Result};
use crate::index::{validate_top_k, VectorIndex};

/// A [`VectorIndex`] backed by [Qdrant](https://qdrant.tech/).
pub struct QdrantIndex {
    client: Qdrant,
}

impl QdrantIndex {
    /// Connect to Qdrant at the given gRPC URL.
    pub fn new(url: &str) -> Result<Self> {
        let client = Qdrant::from_url(url).build().map_err(Self::map_err)?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn from_client(client: Qdrant) -> Self {
        Self { client }
    }

    fn map_err(e: qdrant_client::QdrantError) -> RagError {
        RagError::IndexUnavailable(e.to_string())
    }

    fn extract_string(value: &QdrantValue) -> Option<String> {
        match &value.kind {
            Some(Kind::StringValue(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn extract_integer(value: &QdrantValue) -> Option<usize> {
        match &value.kind {
            Some(Kind::IntegerValue(n)) if *n >= 0 => Some(*n as usize),
            _ => None,
        }
    }

    fn collection_dimension(info: &CollectionInfo) -> Option<u64> {
        let config = info
            .config
            .as_ref()?
            .params
            .as_ref()?
            .vectors_config
            .as_ref()?
            .config
            .as_ref()?;
        match config {
            VectorsConfigKind::Params(params) => Some(params.size),
            VectorsConfigKind::ParamsMap(_) => None,
        }
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        let collections = self.client.list_collections().await.map_err(Self::map_err)?;
        Ok(collections.collections.iter().any(|c| c.name == name))
    }

    async fn create(&self, name: &str, dimension: usize) -> Result<()> {
        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(dimension as u64, Distance::Cosine)),
            )
            .await
            .map_err(Self::map_err)?;
        debug!(collection = name, dimension, "created qdrant collection");
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn ensure_collection(&self, name: &str, dimension: usize) -> Result<()> {
        if self.collection_exists(name).await? {
            let info = self.client.collection_info(name).await.map_err(Self::map_err)?;
            if let Some(existing) = info.result.as_ref().and_then(Self::collection_dimension) {
                if existing != dimension as u64 {
                    return Err(RagError::DimensionMismatch {
                        collection: name.to_string(),
                        existing: existing as usize,
                        requested: dimension,
                    });
                }
            }
            debug!(collection = name, "qdrant collection already exists, skipping creation");
            return Ok(());
        }
        self.create(name, dimension).await
    }

    async fn upsert(&self, collection: &str, points: &[PointRecord]) -> Result<usize> {
        if points.is_empty() {
            return Ok(0);
        }

        let structs: Vec<PointStruct> = points
            .iter()
            .map(|point| {
                let payload = Payload::try_from(serde_json::json!({
                    "text": point.text,
                    "source": point.source,
                    "document_id": point.document_id,
                    "chunk_index": point.chunk_index,
                }))
                .unwrap_or_default();
                PointStruct::new(point.point_id().to_string(), point.vector.clone(), payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, structs).wait(true))
            .await
            .map_err(Self::map_err)?;

        debug!(collection, count = points.len(), "upserted points to qdrant");
        Ok(points.len())
    }

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>> {
        validate_top_k(top_k)?;

        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, vector.to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(Self::map_err)?;

        let results = response
            .result
            .into_iter()
            .map(|scored| RetrievedChunk {
                score: scored.score,
                text: scored.payload.get("text").and_then(Self::extract_string).unwrap_or_default(),
                source: scored
                    .payload
                    .get("source")
                    .and_then(Self::extract_string)
                    .unwrap_or_default(),
                chunk_index: scored
                    .payload
                    .get("chunk_index")
                    .and_then(Self::extract_integer)
                    .unwrap_or_default(),
                document_id: scored
                    .payload
                    .get("document_id")
                    .and_then(Self::extract_string)
                    .unwrap_or_default(),
            })
            .collect();

        Ok(results)
    }

    async fn delete_document(&self, collection: &str, document_id: &str) -> Result<()> {
        self.client
            .delete_points(
                DeletePointsBuilder::new(collection)
                    .points(Filter::must([Condition::matches(
                        "document_id",
                        document_id.to_string(),
                    )]))
                    .wait(true),
            )
            .await
            .map_err(Self::map_err)?;

        debug!(collection, document_id, "deleted document points from qdrant");
        Ok(())
    }

    async fn reset(&self, collection: &str, dimension: usize) -> Result<()> {
        if self.collection_exists(collection).await? {
            self.client.delete_collection(collection).await.map_err(Self::map_err)?;
            debug!(collection, "deleted qdrant collection");
        }
        self.create(collection, dimension).await
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        let info = self.client.collection_info(collection).await.map_err(Self::map_err)?;
        Ok(info.result.and_then(|r| r.points_count).unwrap_or(0) as usize)
    }
}
