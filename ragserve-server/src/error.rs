//! Mapping from pipeline errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ragserve_core::RagError;
use serde_json::json;
use tracing::error;

/// A [`RagError`] carried across an axum handler boundary.
///
/// Validation errors map to 400, unsupported uploads to 415, everything
/// else (collaborator failures) to 500. Error bodies are
/// `{"detail": "..."}`.
pub struct ApiError(pub RagError);

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RagError::InvalidRequest(_)
            | RagError::InvalidTopK(_)
            | RagError::InvalidGenerationBudget(_)
            | RagError::InvalidChunkParameters { .. } => StatusCode::BAD_REQUEST,
            RagError::UnsupportedFormat { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RagError::ExtractionError { .. }
            | RagError::EmbeddingFailure { .. }
            | RagError::GenerationFailure { .. }
            | RagError::IndexUnavailable(_)
            | RagError::DimensionMismatch { .. }
            | RagError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }

        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}
