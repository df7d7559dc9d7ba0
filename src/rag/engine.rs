//! Pipeline facade: everything the HTTP layer calls lives here.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::core::config::RagSettings;
use crate::core::errors::RagError;
use crate::extract::extract_text;
use crate::llm::provider::{EmbeddingProvider, GenerationProvider};
use crate::rag::chunker::chunk_text;
use crate::rag::index::VectorIndex;
use crate::rag::registry::{DocumentMeta, SessionRegistry};
use crate::rag::retriever::Retriever;
use crate::rag::synthesizer::{Answer, AnswerSynthesizer};

#[derive(Debug, Clone, Serialize)]
pub struct IngestReceipt {
    pub doc_id: String,
    pub chunk_count: usize,
}

/// Owns the registry and the injected provider clients; one instance per
/// process, constructed at startup.
pub struct RagEngine {
    settings: RagSettings,
    registry: SessionRegistry,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerationProvider>,
    retriever: Retriever,
    synthesizer: AnswerSynthesizer,
}

impl RagEngine {
    pub fn new(
        settings: RagSettings,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
    ) -> Self {
        let registry = SessionRegistry::new();
        let retriever = Retriever::new(
            registry.clone(),
            embedder.clone(),
            settings.top_k,
            settings.min_score,
        );
        let synthesizer = AnswerSynthesizer::new(settings.max_context_chars);
        Self {
            settings,
            registry,
            embedder,
            generator,
            retriever,
            synthesizer,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Ingests one document: extract → chunk → embed → index → register.
    ///
    /// The document id is the uploaded file's name; re-uploading a file
    /// replaces its index. Registration happens only after every chunk is
    /// embedded and inserted, so a failed ingestion leaves no partial state.
    pub async fn ingest(&self, path: &Path) -> Result<IngestReceipt, RagError> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        let doc_id = filename.clone();

        let text = extract_text(path).await?;
        let chunks = chunk_text(
            &text,
            &doc_id,
            self.settings.chunk_size,
            self.settings.chunk_overlap,
        )?;

        let mut index = VectorIndex::new(&doc_id);
        for chunk in chunks {
            let embedding = self.embedder.embed(&chunk.text).await?;
            index.insert(chunk, embedding)?;
        }

        let meta = self.registry.register(index, &filename).await;
        tracing::info!(doc_id = %meta.doc_id, chunks = meta.chunk_count, "document ingested");
        Ok(IngestReceipt {
            doc_id: meta.doc_id,
            chunk_count: meta.chunk_count,
        })
    }

    /// Answers a question from one document's content alone.
    ///
    /// A missing document is not an error here: stale ids from the client
    /// degrade to the no-information answer. Provider failures propagate.
    pub async fn query(&self, query: &str, doc_id: &str) -> Result<Answer, RagError> {
        let chunks = match self.retriever.retrieve(query, doc_id).await {
            Ok(chunks) => chunks,
            Err(RagError::DocumentNotFound(_)) => {
                tracing::debug!(doc_id, "query against unknown document");
                Vec::new()
            }
            Err(err) => return Err(err),
        };

        self.synthesizer
            .answer(self.generator.as_ref(), query, &chunks)
            .await
    }

    /// Removes one document's index. Idempotent.
    pub async fn remove_document(&self, doc_id: &str) -> bool {
        let removed = self.registry.remove(doc_id).await;
        if removed {
            tracing::info!(doc_id, "document removed");
        }
        removed
    }

    /// Drops every registered document; returns how many were dropped.
    pub async fn clear_session(&self) -> usize {
        let dropped = self.registry.clear_all().await;
        tracing::info!(dropped, "session cleared");
        dropped
    }

    pub async fn list_documents(&self) -> Vec<DocumentMeta> {
        self.registry.list().await
    }
}
