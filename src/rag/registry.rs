//! Process-wide session registry: document id → vector index + metadata.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::rag::index::VectorIndex;

/// Metadata recorded for each registered document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentMeta {
    pub doc_id: String,
    pub filename: String,
    pub chunk_count: usize,
    pub created_at: DateTime<Utc>,
}

struct DocumentEntry {
    index: Arc<VectorIndex>,
    meta: DocumentMeta,
}

/// Shared map of ingested documents, alive for the process lifetime.
///
/// Re-registering an id replaces the previous entry — re-uploading a file
/// overwrites its index. Indices are held behind `Arc`, so an in-flight query
/// keeps a consistent snapshot even if the document is removed concurrently.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<String, DocumentEntry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fully-built index. Only ingestion calls this, and only
    /// after every chunk has been embedded and inserted.
    pub async fn register(&self, index: VectorIndex, filename: &str) -> DocumentMeta {
        debug_assert!(!index.is_empty(), "never register an empty index");
        let meta = DocumentMeta {
            doc_id: index.doc_id().to_string(),
            filename: filename.to_string(),
            chunk_count: index.len(),
            created_at: Utc::now(),
        };
        let entry = DocumentEntry {
            index: Arc::new(index),
            meta: meta.clone(),
        };
        self.inner.write().await.insert(meta.doc_id.clone(), entry);
        meta
    }

    pub async fn get(&self, doc_id: &str) -> Option<Arc<VectorIndex>> {
        self.inner
            .read()
            .await
            .get(doc_id)
            .map(|entry| entry.index.clone())
    }

    /// Removes one document. Idempotent; reports whether anything was there.
    pub async fn remove(&self, doc_id: &str) -> bool {
        self.inner.write().await.remove(doc_id).is_some()
    }

    /// Empties the registry, returning how many documents were dropped.
    pub async fn clear_all(&self) -> usize {
        let mut guard = self.inner.write().await;
        let dropped = guard.len();
        guard.clear();
        dropped
    }

    pub async fn list(&self) -> Vec<DocumentMeta> {
        let guard = self.inner.read().await;
        let mut docs: Vec<DocumentMeta> = guard.values().map(|entry| entry.meta.clone()).collect();
        docs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        docs
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::chunker::Chunk;

    fn index_with_chunks(doc_id: &str, count: usize) -> VectorIndex {
        let mut index = VectorIndex::new(doc_id);
        for i in 0..count {
            let chunk = Chunk {
                chunk_id: format!("{doc_id}-{i}"),
                text: format!("chunk {i}"),
                source: doc_id.to_string(),
                chunk_index: i,
                start_word: 0,
            };
            index.insert(chunk, vec![1.0, 0.0]).unwrap();
        }
        index
    }

    #[tokio::test]
    async fn reregistering_overwrites_the_previous_index() {
        let registry = SessionRegistry::new();
        registry
            .register(index_with_chunks("doc", 2), "doc.txt")
            .await;
        registry
            .register(index_with_chunks("doc", 5), "doc.txt")
            .await;

        assert_eq!(registry.len().await, 1);
        let index = registry.get("doc").await.expect("registered");
        assert_eq!(index.len(), 5);
    }

    #[tokio::test]
    async fn remove_is_idempotent_and_allows_reregistration() {
        let registry = SessionRegistry::new();
        registry
            .register(index_with_chunks("doc", 1), "doc.txt")
            .await;

        assert!(registry.remove("doc").await);
        assert!(!registry.remove("doc").await);
        assert!(registry.get("doc").await.is_none());

        registry
            .register(index_with_chunks("doc", 3), "doc.txt")
            .await;
        assert_eq!(registry.get("doc").await.expect("fresh entry").len(), 3);
    }

    #[tokio::test]
    async fn clear_all_empties_the_registry() {
        let registry = SessionRegistry::new();
        registry.register(index_with_chunks("a", 1), "a.txt").await;
        registry.register(index_with_chunks("b", 1), "b.txt").await;

        assert_eq!(registry.clear_all().await, 2);
        assert_eq!(registry.len().await, 0);
        assert!(registry.list().await.is_empty());
    }
}
