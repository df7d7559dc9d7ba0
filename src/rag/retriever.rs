//! Query-side retrieval: embed, search one document's index, filter.

use std::sync::Arc;

use crate::core::errors::RagError;
use crate::llm::provider::EmbeddingProvider;
use crate::rag::chunker::Chunk;
use crate::rag::registry::SessionRegistry;

pub struct Retriever {
    registry: SessionRegistry,
    embedder: Arc<dyn EmbeddingProvider>,
    top_k: usize,
    min_score: f32,
}

impl Retriever {
    pub fn new(
        registry: SessionRegistry,
        embedder: Arc<dyn EmbeddingProvider>,
        top_k: usize,
        min_score: f32,
    ) -> Self {
        Self {
            registry,
            embedder,
            top_k,
            min_score,
        }
    }

    /// Returns the most similar chunks of `doc_id` for `query`, best first.
    ///
    /// The index lookup happens before the embedding call so an unknown
    /// document costs nothing. `DocumentNotFound` is an expected outcome the
    /// engine degrades to a sentinel answer; hits below `min_score` are
    /// dropped so an off-topic query yields no context at all. Every returned
    /// chunk's source equals `doc_id`.
    pub async fn retrieve(&self, query: &str, doc_id: &str) -> Result<Vec<Chunk>, RagError> {
        let index = self
            .registry
            .get(doc_id)
            .await
            .ok_or_else(|| RagError::DocumentNotFound(doc_id.to_string()))?;

        let query_vector = self.embedder.embed(query).await?;
        let hits = index.search(&query_vector, self.top_k);

        let chunks: Vec<Chunk> = hits
            .into_iter()
            .filter(|hit| hit.score >= self.min_score)
            .map(|hit| hit.chunk)
            .collect();

        tracing::debug!(doc_id, returned = chunks.len(), "retrieval finished");
        Ok(chunks)
    }
}
