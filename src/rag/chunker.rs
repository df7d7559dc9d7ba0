//! Sliding word-window chunking.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::core::errors::RagError;

/// A bounded span of a document's text, the atomic unit of embedding and
/// retrieval. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Content-hash key, stable for identical (source, index, text) triples.
    pub chunk_id: String,
    pub text: String,
    /// Id of the document this chunk was cut from.
    pub source: String,
    pub chunk_index: usize,
    /// Word offset of the chunk's first token in the normalized document.
    pub start_word: usize,
}

/// Splits normalized text into overlapping word windows.
///
/// The window holds `chunk_size` words and steps by `chunk_size - overlap`,
/// so consecutive chunks share exactly `overlap` words; the final window is
/// clamped to the end of the text. Deterministic: identical input and
/// parameters always produce the identical chunk sequence.
pub fn chunk_text(
    text: &str,
    source: &str,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<Chunk>, RagError> {
    let chunk_size = chunk_size.max(1);
    let step = chunk_size.saturating_sub(overlap).max(1);

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Err(RagError::EmptyInput);
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut index = 0;
    loop {
        let end = (start + chunk_size).min(words.len());
        let body = words[start..end].join(" ");
        chunks.push(Chunk {
            chunk_id: content_key(source, index, &body),
            text: body,
            source: source.to_string(),
            chunk_index: index,
            start_word: start,
        });

        if end == words.len() {
            break;
        }
        start += step;
        index += 1;
    }

    Ok(chunks)
}

fn content_key(source: &str, index: usize, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update(index.to_le_bytes());
    hasher.update(text.as_bytes());
    hex::encode(&hasher.finalize()[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = words(137);
        let first = chunk_text(&text, "doc", 50, 10).expect("chunk");
        let second = chunk_text(&text, "doc", 50, 10).expect("chunk");

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.chunk_id, b.chunk_id);
            assert_eq!(a.text, b.text);
            assert_eq!(a.start_word, b.start_word);
        }
    }

    #[test]
    fn windows_respect_size_and_overlap() {
        let text = words(120);
        let chunks = chunk_text(&text, "doc", 50, 10).expect("chunk");

        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(chunk.text.split_whitespace().count() <= 50);
        }
        for pair in chunks.windows(2) {
            let left: Vec<&str> = pair[0].text.split_whitespace().collect();
            let right: Vec<&str> = pair[1].text.split_whitespace().collect();
            // the last 10 words of one window open the next
            assert_eq!(&left[left.len() - 10..], &right[..10]);
        }
    }

    #[test]
    fn skipping_overlap_reconstructs_the_text() {
        let text = words(203);
        let overlap = 15;
        let chunks = chunk_text(&text, "doc", 64, overlap).expect("chunk");

        let mut rebuilt: Vec<String> = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let tokens = chunk.text.split_whitespace().map(str::to_string);
            if i == 0 {
                rebuilt.extend(tokens);
            } else {
                rebuilt.extend(tokens.skip(overlap));
            }
        }
        assert_eq!(rebuilt.join(" "), text);
    }

    #[test]
    fn short_text_yields_a_single_chunk() {
        let chunks = chunk_text("just a few words", "doc", 320, 60).expect("chunk");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "just a few words");
        assert_eq!(chunks[0].start_word, 0);
    }

    #[test]
    fn whitespace_only_input_is_rejected() {
        assert!(matches!(
            chunk_text("   \n\t ", "doc", 320, 60),
            Err(RagError::EmptyInput)
        ));
    }

    #[test]
    fn chunk_ids_differ_across_sources() {
        let a = chunk_text("same words here", "doc-a", 320, 60).expect("chunk");
        let b = chunk_text("same words here", "doc-b", 320, 60).expect("chunk");
        assert_ne!(a[0].chunk_id, b[0].chunk_id);
    }
}
