//! Model provider boundary.
//!
//! Two narrow traits — embedding and generation — plus one HTTP client that
//! speaks the OpenAI wire shape. Swapping the backend never touches the
//! chunker, the index or the synthesizer.

pub mod openai;
pub mod provider;

pub use openai::OpenAiCompatClient;
pub use provider::{EmbeddingProvider, GenerationProvider};
