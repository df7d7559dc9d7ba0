use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::core::errors::ApiError;
use crate::state::AppState;

/// `POST /upload` — multipart upload, saved under the uploads dir and
/// ingested. The file name becomes the document id.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut saved: Option<PathBuf> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(format!("Invalid multipart payload: {err}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(sanitize_filename)
            .unwrap_or_else(|| format!("upload-{}.txt", Uuid::new_v4()));
        let data = field
            .bytes()
            .await
            .map_err(|err| ApiError::BadRequest(format!("Failed to read upload: {err}")))?;
        if data.is_empty() {
            return Err(ApiError::BadRequest("The uploaded file is empty.".to_string()));
        }

        let path = state.paths.upload_dir.join(&filename);
        tokio::fs::write(&path, &data)
            .await
            .map_err(ApiError::internal)?;
        saved = Some(path);
        break;
    }

    let path = saved.ok_or_else(|| {
        ApiError::BadRequest("Missing 'file' field in the upload form.".to_string())
    })?;

    let receipt = state.engine.ingest(&path).await?;
    Ok(Json(json!({
        "status": "ok",
        "doc_id": receipt.doc_id,
        "chunks": receipt.chunk_count,
    })))
}

/// `DELETE /api/documents/:doc_id` — idempotent removal.
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = state.engine.remove_document(&doc_id).await;
    Ok(Json(json!({
        "status": "ok",
        "doc_id": doc_id,
        "removed": removed,
    })))
}

/// `GET /history` — documents registered in this session, oldest first.
pub async fn history(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let documents = state.engine.list_documents().await;
    let result: Vec<Value> = documents
        .into_iter()
        .map(|doc| {
            json!({
                "doc_id": doc.doc_id,
                "filename": doc.filename,
                "chunks": doc.chunk_count,
                "created_at": doc.created_at,
            })
        })
        .collect();
    Ok(Json(json!({ "documents": result })))
}

/// Drops any directory components a client might smuggle in.
fn sanitize_filename(name: &str) -> String {
    FsPath::new(name)
        .file_name()
        .and_then(|base| base.to_str())
        .unwrap_or("upload")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_lose_directory_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("manual.pdf"), "manual.pdf");
        assert_eq!(sanitize_filename("dir/notes.md"), "notes.md");
    }
}
