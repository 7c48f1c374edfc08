//! Route-level tests over the in-memory index with stub model
//! collaborators.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use ragserve_core::{
    Embedder, Generator, InMemoryIndex, PlainTextExtractor, RagConfig, RagError, Result,
    VectorIndex,
};
use ragserve_server::routes::router;
use ragserve_server::state::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

const DIM: usize = 8;

struct StubEmbedder;

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut v = vec![0.01_f32; DIM];
                for (i, b) in text.bytes().enumerate() {
                    v[i % DIM] += f32::from(b) / 255.0;
                }
                v
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        DIM
    }
}

struct StubGenerator;

#[async_trait]
impl Generator for StubGenerator {
    async fn generate(&self, _prompt: &str, max_new_tokens: u32) -> Result<String> {
        if max_new_tokens == 0 {
            return Err(RagError::InvalidGenerationBudget(max_new_tokens));
        }
        Ok("grounded stub answer".to_string())
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

async fn app() -> Router {
    let config = RagConfig {
        collection: "http_test".to_string(),
        chunk_size: 512,
        chunk_overlap: 64,
        top_k: 5,
        max_new_tokens: 64,
        max_prompt_chars: 100_000,
        embed_batch_size: 4,
        ..RagConfig::default()
    };
    let index: Arc<dyn VectorIndex> = Arc::new(InMemoryIndex::new());
    index.ensure_collection(&config.collection, DIM).await.unwrap();
    let state = Arc::new(AppState::new(
        config,
        Arc::new(PlainTextExtractor::new()),
        Arc::new(StubEmbedder),
        Arc::new(StubGenerator),
        index,
    ));
    router(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart_upload(filename: &str, content: &[u8]) -> Request<Body> {
    let boundary = "X-RAGSERVE-TEST-BOUNDARY";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{filename}\"\r\nContent-Type: text/plain\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/index")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap()
}

fn chat_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_ready_collection() {
    let app = app().await;
    let response =
        app.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["collection"], "http_test");
    assert_eq!(body["generation_model"], "stub-model");
}

#[tokio::test]
async fn chat_against_empty_collection_returns_answer_with_no_sources() {
    let app = app().await;
    let response =
        app.oneshot(chat_request(json!({ "query": "anything indexed?", "top_k": 5 }))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(!body["answer"].as_str().unwrap().is_empty());
    assert_eq!(body["sources"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn chat_rejects_invalid_parameters_with_400() {
    let app = app().await;

    let response =
        app.clone().oneshot(chat_request(json!({ "query": "", "top_k": 5 }))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response =
        app.clone().oneshot(chat_request(json!({ "query": "q", "top_k": 0 }))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(chat_request(json!({ "query": "q", "max_new_tokens": 0 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn index_then_chat_returns_attributed_sources() {
    let app = app().await;

    let content = "the capital of atlantis is poseidonia. ".repeat(26);
    let response = app.clone().oneshot(multipart_upload("atlantis.txt", content.as_bytes())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["chunks_indexed"], 3);
    assert!(!body["document_id"].as_str().unwrap().is_empty());

    let response = app
        .oneshot(chat_request(json!({ "query": "capital of atlantis?", "top_k": 2 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let sources = body["sources"].as_array().unwrap();
    assert!(!sources.is_empty());
    assert!(sources.len() <= 2);
    for source in sources {
        assert_eq!(source["source"], "atlantis.txt");
        assert!(source["score"].is_number());
        assert!(source["chunk_id"].is_number());
        assert!(!source["text"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn unsupported_upload_type_is_415() {
    let app = app().await;
    let response = app.oneshot(multipart_upload("slides.pdf", b"%PDF-1.4")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn multipart_without_file_field_is_400() {
    let app = app().await;
    let boundary = "X-RAGSERVE-TEST-BOUNDARY";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"meta\"\r\n\r\nnot a file\r\n--{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/index")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_collection_wipes_indexed_documents() {
    let app = app().await;

    let content = "e".repeat(1000);
    let response =
        app.clone().oneshot(multipart_upload("doc.txt", content.as_bytes())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(Request::builder().method("DELETE").uri("/collection").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Collection is ready but empty: chat degrades to an unsourced answer.
    let response =
        app.clone().oneshot(chat_request(json!({ "query": "still there?" }))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sources"].as_array().unwrap().len(), 0);

    let response =
        app.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
