//! Grounded answer synthesis from retrieved chunks.

use serde::Serialize;

use crate::core::errors::RagError;
use crate::extract::{decode_entities, strip_html_tags};
use crate::llm::provider::GenerationProvider;
use crate::rag::chunker::Chunk;

/// Fixed reply when retrieval produced no usable context. Returned without
/// calling the generation model.
pub const NO_INFORMATION_ANSWER: &str =
    "I don't have enough information in this document to answer that.";

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub answer: String,
    /// Document ids the answer was grounded on, de-duplicated, in first-use order.
    pub sources: Vec<String>,
}

pub struct AnswerSynthesizer {
    max_context_chars: usize,
}

impl AnswerSynthesizer {
    pub fn new(max_context_chars: usize) -> Self {
        Self { max_context_chars }
    }

    /// Builds a context-only prompt from the chunks and asks the generator
    /// once. An empty chunk list short-circuits to [`NO_INFORMATION_ANSWER`]
    /// with no provider call.
    pub async fn answer(
        &self,
        generator: &dyn GenerationProvider,
        query: &str,
        chunks: &[Chunk],
    ) -> Result<Answer, RagError> {
        if chunks.is_empty() {
            return Ok(Answer {
                answer: NO_INFORMATION_ANSWER.to_string(),
                sources: Vec::new(),
            });
        }

        let selected = self.select_within_budget(chunks);
        let context = selected
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = build_prompt(&context, query);

        let raw = generator.generate(&prompt).await?;
        Ok(Answer {
            answer: sanitize(&raw),
            sources: collect_sources(&selected),
        })
    }

    /// Keeps chunks, in retrieval order, until the context budget is spent.
    /// The first chunk is always kept so a non-empty retrieval never
    /// degenerates into an empty prompt.
    fn select_within_budget<'a>(&self, chunks: &'a [Chunk]) -> Vec<&'a Chunk> {
        let mut selected = Vec::new();
        let mut used = 0;
        for chunk in chunks {
            let cost = chunk.text.len() + 2;
            if !selected.is_empty() && used + cost > self.max_context_chars {
                break;
            }
            used += cost;
            selected.push(chunk);
        }
        selected
    }
}

fn build_prompt(context: &str, query: &str) -> String {
    format!(
        "You are a technical assistant answering questions about internal documents.\n\
         Answer using only the context below. If the context does not contain the answer,\n\
         say you do not have enough information.\n\n\
         Context:\n{context}\n\nQuestion:\n{query}"
    )
}

fn collect_sources(chunks: &[&Chunk]) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for chunk in chunks {
        if !sources.iter().any(|seen| seen == &chunk.source) {
            sources.push(chunk.source.clone());
        }
    }
    sources
}

/// Strips markup, decodes entities and drops non-printable characters from a
/// model reply. Clean text passes through unchanged.
pub fn sanitize(text: &str) -> String {
    let stripped = strip_html_tags(text);
    let decoded = decode_entities(&stripped);
    decoded
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}
