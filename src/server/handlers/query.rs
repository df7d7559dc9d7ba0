use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(alias = "documentId")]
    pub document_id: String,
}

/// `POST /query` — answer a question from one document's content.
///
/// A stale or unknown document id is not an error: the engine degrades to
/// its fixed no-information answer.
pub async fn query(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QueryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.query.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Missing or empty 'query' field.".to_string(),
        ));
    }
    if payload.document_id.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Missing or empty 'document_id' field.".to_string(),
        ));
    }

    let answer = state
        .engine
        .query(&payload.query, &payload.document_id)
        .await?;

    Ok(Json(json!({
        "answer": answer.answer,
        "sources": answer.sources,
    })))
}

/// `POST /clear` — full session reset.
pub async fn clear(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let dropped = state.engine.clear_session().await;
    Ok(Json(json!({
        "status": "cleared",
        "documents_dropped": dropped,
    })))
}
