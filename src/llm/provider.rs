use async_trait::async_trait;

use crate::core::errors::RagError;

/// Converts one text span into a fixed-length embedding vector.
///
/// Pure from the caller's perspective; implementations may cache. Transport,
/// auth and quota failures surface as `RagError::EmbeddingService` and are
/// not retried at this layer.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError>;
}

/// Produces a completion for a fully-built prompt. One call per answer, no
/// multi-turn state, no internal retries.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, RagError>;
}
