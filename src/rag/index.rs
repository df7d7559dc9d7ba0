//! In-memory vector index, scoped to exactly one document.

use crate::core::errors::RagError;
use crate::rag::chunker::Chunk;
use crate::rag::similarity::{by_score_desc, cosine_similarity};

/// A chunk scored against a query vector.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Exact nearest-neighbor store for one document's chunks.
///
/// Search is a linear scan under cosine similarity; at hundreds of chunks per
/// document that is both the reference behavior and fast enough.
#[derive(Debug)]
pub struct VectorIndex {
    doc_id: String,
    entries: Vec<(Chunk, Vec<f32>)>,
}

impl VectorIndex {
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            entries: Vec::new(),
        }
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|(chunk, _)| chunk)
    }

    /// Appends a chunk and its embedding. A chunk cut from a different
    /// document is rejected; an index never mixes sources.
    pub fn insert(&mut self, chunk: Chunk, embedding: Vec<f32>) -> Result<(), RagError> {
        if chunk.source != self.doc_id {
            return Err(RagError::Internal(format!(
                "chunk from '{}' offered to index for '{}'",
                chunk.source, self.doc_id
            )));
        }
        self.entries.push((chunk, embedding));
        Ok(())
    }

    /// Returns the top `k` chunks by descending cosine similarity to the
    /// query vector. Ties keep insertion order (stable sort); `k` is clamped
    /// to the index size and an empty index yields an empty result.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|(chunk, embedding)| ScoredChunk {
                chunk: chunk.clone(),
                score: cosine_similarity(query, embedding),
            })
            .collect();

        scored.sort_by(|a, b| by_score_desc(a.score, b.score));
        scored.truncate(k);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(doc: &str, index: usize, text: &str) -> Chunk {
        Chunk {
            chunk_id: format!("{doc}-{index}"),
            text: text.to_string(),
            source: doc.to_string(),
            chunk_index: index,
            start_word: 0,
        }
    }

    fn filled_index() -> VectorIndex {
        let mut index = VectorIndex::new("doc");
        index
            .insert(chunk("doc", 0, "east"), vec![0.9, 0.1, 0.0])
            .unwrap();
        index
            .insert(chunk("doc", 1, "north"), vec![0.0, 1.0, 0.0])
            .unwrap();
        index
            .insert(chunk("doc", 2, "east exact"), vec![1.0, 0.0, 0.0])
            .unwrap();
        index
    }

    #[test]
    fn search_ranks_by_descending_similarity() {
        let index = filled_index();
        let hits = index.search(&[1.0, 0.0, 0.0], 3);

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].chunk.chunk_index, 2);
        assert_eq!(hits[1].chunk.chunk_index, 0);
        assert_eq!(hits[2].chunk.chunk_index, 1);
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn k_is_clamped_to_index_size() {
        let index = filled_index();
        assert_eq!(index.search(&[1.0, 0.0, 0.0], 10).len(), 3);
        assert_eq!(index.search(&[1.0, 0.0, 0.0], 1).len(), 1);
    }

    #[test]
    fn empty_index_returns_no_hits() {
        let index = VectorIndex::new("doc");
        assert!(index.search(&[1.0, 0.0], 5).is_empty());
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut index = VectorIndex::new("doc");
        for i in 0..4 {
            index
                .insert(chunk("doc", i, "same"), vec![1.0, 0.0])
                .unwrap();
        }
        let hits = index.search(&[1.0, 0.0], 4);
        let order: Vec<usize> = hits.iter().map(|h| h.chunk.chunk_index).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn foreign_chunks_are_rejected() {
        let mut index = VectorIndex::new("doc-a");
        let result = index.insert(chunk("doc-b", 0, "intruder"), vec![1.0]);
        assert!(result.is_err());
        assert!(index.is_empty());
    }
}
