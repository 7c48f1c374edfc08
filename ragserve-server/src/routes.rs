//! HTTP routes and request/response schemas.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use ragserve_core::{Answer, ChatRequest, RagError, RetrievedChunk};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/index", post(index_document))
        .route("/chat", post(chat))
        .route("/health", get(health))
        .route("/collection", delete(reset_collection))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct IndexResponse {
    message: String,
    chunks_indexed: usize,
    document_id: String,
}

#[derive(Deserialize)]
struct ChatBody {
    query: String,
    top_k: Option<usize>,
    max_new_tokens: Option<u32>,
}

#[derive(Serialize)]
struct SourceEntry {
    score: f32,
    text: String,
    source: String,
    chunk_id: usize,
}

#[derive(Serialize)]
struct ChatResponse {
    answer: String,
    sources: Vec<SourceEntry>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    collection: String,
    embedding_model: String,
    generation_model: String,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

impl From<RetrievedChunk> for SourceEntry {
    fn from(chunk: RetrievedChunk) -> Self {
        Self { score: chunk.score, text: chunk.text, source: chunk.source, chunk_id: chunk.chunk_index }
    }
}

impl From<Answer> for ChatResponse {
    fn from(answer: Answer) -> Self {
        Self {
            answer: answer.answer,
            sources: answer.sources.into_iter().map(SourceEntry::from).collect(),
        }
    }
}

/// `POST /index` — multipart file upload; chunks, embeds, and indexes the
/// document.
async fn index_document(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<IndexResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError(RagError::InvalidRequest(format!("malformed multipart body: {e}")))
    })? {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type =
            field.content_type().unwrap_or("application/octet-stream").to_string();
        let bytes = field.bytes().await.map_err(|e| {
            ApiError(RagError::InvalidRequest(format!("failed to read upload: {e}")))
        })?;

        let report = state.ingestion.ingest(&filename, &content_type, &bytes).await?;
        return Ok(Json(IndexResponse {
            message: format!("Successfully indexed '{filename}'"),
            chunks_indexed: report.chunks_indexed,
            document_id: report.document_id,
        }));
    }

    Err(ApiError(RagError::InvalidRequest(
        "multipart body must contain a file field".to_string(),
    )))
}

/// `POST /chat` — retrieve grounding chunks and generate an answer.
/// `top_k` and `max_new_tokens` default from configuration.
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = ChatRequest {
        query: body.query,
        top_k: body.top_k.unwrap_or(state.config.top_k),
        max_new_tokens: body.max_new_tokens.unwrap_or(state.config.max_new_tokens),
    };
    let answer = state.query.answer(&request).await?;
    Ok(Json(answer.into()))
}

/// `GET /health` — process readiness, not exercised logic.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        collection: state.config.collection.clone(),
        embedding_model: state.config.embedding_model.clone(),
        generation_model: state.generation_model.clone(),
    })
}

/// `DELETE /collection` — wipe and recreate the active collection.
/// Irreversible.
async fn reset_collection(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.index.reset(&state.config.collection, state.dimension).await?;
    Ok(Json(MessageResponse {
        message: format!("Collection '{}' reset successfully.", state.config.collection),
    }))
}
