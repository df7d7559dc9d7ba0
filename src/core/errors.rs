use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Domain errors for the document pipeline.
///
/// Expected outcomes (a missing document, a query with no usable context) are
/// tagged variants callers pattern-match on; only provider and I/O failures are
/// true service errors.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to read document: {0}")]
    Extraction(String),
    #[error("document contains no extractable text")]
    EmptyContent,
    #[error("no tokens left after normalization")]
    EmptyInput,
    #[error("embedding service error: {0}")]
    EmbeddingService(String),
    #[error("generation service error: {0}")]
    GenerationService(String),
    #[error("document not found: {0}")]
    DocumentNotFound(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors surfaced over HTTP. Every variant renders as a JSON body with an
/// action-oriented message, never a raw library error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::UnsupportedFormat(ext) => ApiError::BadRequest(format!(
                "Unsupported file format '{ext}'. Upload a .pdf, .md or .txt file."
            )),
            RagError::Extraction(msg) => ApiError::BadRequest(format!(
                "The file could not be parsed: {msg}. Re-export the document and try again."
            )),
            RagError::EmptyContent => ApiError::BadRequest(
                "The document contains no readable text. Scanned or image-only PDFs are not supported."
                    .to_string(),
            ),
            RagError::EmptyInput => ApiError::BadRequest(
                "The document text was empty after cleanup; there is nothing to index.".to_string(),
            ),
            RagError::EmbeddingService(msg) => {
                ApiError::ServiceUnavailable(format!("The embedding service failed: {msg}"))
            }
            RagError::GenerationService(msg) => {
                ApiError::ServiceUnavailable(format!("The generation service failed: {msg}"))
            }
            RagError::DocumentNotFound(id) => {
                ApiError::NotFound(format!("No document '{id}' is registered in this session."))
            }
            RagError::Io(err) => ApiError::internal(err),
            RagError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
