//! HTTP surface for the ragserve RAG pipeline.
//!
//! Exposes four routes over a shared [`AppState`](state::AppState):
//! `POST /index` (multipart document upload), `POST /chat` (grounded
//! question answering), `GET /health`, and `DELETE /collection`.

pub mod error;
pub mod routes;
pub mod state;
