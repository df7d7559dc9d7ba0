//! Per-document retrieval pipeline.
//!
//! Ingestion runs extraction → chunking → embedding → indexing and registers
//! the finished index under the document id. Queries embed the question,
//! search that document's index only and hand the top chunks to the
//! synthesizer for a grounded answer.

pub mod chunker;
pub mod engine;
pub mod index;
pub mod registry;
pub mod retriever;
pub mod similarity;
pub mod synthesizer;

pub use chunker::Chunk;
pub use engine::{IngestReceipt, RagEngine};
pub use index::VectorIndex;
pub use registry::{DocumentMeta, SessionRegistry};
pub use synthesizer::{Answer, NO_INFORMATION_ANSWER};
