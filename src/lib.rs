//! TechDocs assistant backend: upload a document, ask questions answered
//! from that document's content alone.

pub mod core;
pub mod extract;
pub mod llm;
pub mod rag;
pub mod server;
pub mod state;
